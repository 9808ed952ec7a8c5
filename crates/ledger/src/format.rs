//! Display helpers for monetary values.

use crate::MoneyCents;

/// Placeholder shown instead of amounts while privacy mode is on.
pub const PRIVACY_MASK: &str = "••,•••.••";

/// Formats an amount as `$1,234.56` (`-$1,234.56` when negative).
///
/// # Examples
///
/// ```rust
/// use ledger::{MoneyCents, format::format_currency};
///
/// assert_eq!(format_currency(MoneyCents::new(123_456_78)), "$123,456.78");
/// assert_eq!(format_currency(MoneyCents::new(-5)), "-$0.05");
/// ```
#[must_use]
pub fn format_currency(amount: MoneyCents) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let (units, cents) = amount.split_abs();
    format!("{sign}${}.{cents:02}", group_thousands(units))
}

/// Formats an amount, or the mask when `privacy` is on.
#[must_use]
pub fn format_amount(amount: MoneyCents, privacy: bool) -> String {
    if privacy {
        return PRIVACY_MASK.to_string();
    }
    format_currency(amount)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
