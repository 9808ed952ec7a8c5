//! Form validation.
//!
//! Runs before any request is issued. Failures are shown next to the form and
//! never reach a store.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::MoneyCents;

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"));

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a source account")]
    MissingSourceAccount,
    #[error("Enter the target account number")]
    MissingTargetAccount,
    #[error("Enter a valid amount")]
    NonPositiveAmount,
    #[error("Enter a description")]
    MissingDescription,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Enter your password")]
    MissingPassword,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Enter your full name")]
    MissingFullName,
    #[error("Enter an account number")]
    MissingAccountNumber,
    #[error("Enter a symbol")]
    MissingSymbol,
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("Price must be greater than zero")]
    NonPositivePrice,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

pub fn validate_registration(
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if is_blank(full_name) {
        return Err(ValidationError::MissingFullName);
    }
    Ok(())
}

pub fn validate_transfer(
    source_account_id: &str,
    target_account_number: &str,
    amount: MoneyCents,
    description: &str,
) -> Result<(), ValidationError> {
    if is_blank(source_account_id) {
        return Err(ValidationError::MissingSourceAccount);
    }
    if is_blank(target_account_number) {
        return Err(ValidationError::MissingTargetAccount);
    }
    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }
    if is_blank(description) {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

pub fn validate_new_account(account_number: &str) -> Result<(), ValidationError> {
    if is_blank(account_number) {
        return Err(ValidationError::MissingAccountNumber);
    }
    Ok(())
}

pub fn validate_investment_buy(
    symbol: &str,
    quantity: Decimal,
    price: Decimal,
) -> Result<(), ValidationError> {
    if is_blank(symbol) {
        return Err(ValidationError::MissingSymbol);
    }
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuantity);
    }
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn email_pattern() {
        assert!(validate_email("ada@example.com").is_ok());
        assert_eq!(validate_email("ada@example"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("not an email"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn registration_rules() {
        assert!(validate_registration("a@b.co", "secret", "Ada").is_ok());
        assert_eq!(
            validate_registration("a@b.co", "short", "Ada"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_registration("a@b.co", "secret", "  "),
            Err(ValidationError::MissingFullName)
        );
    }

    #[test]
    fn login_requires_password() {
        assert_eq!(validate_login("a@b.co", ""), Err(ValidationError::MissingPassword));
    }

    #[test]
    fn transfer_rules_in_order() {
        let ok = MoneyCents::new(1);
        assert_eq!(
            validate_transfer("", "", ok, ""),
            Err(ValidationError::MissingSourceAccount)
        );
        assert_eq!(
            validate_transfer("src", " ", ok, "rent"),
            Err(ValidationError::MissingTargetAccount)
        );
        assert_eq!(
            validate_transfer("src", "ES12", MoneyCents::ZERO, "rent"),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_transfer("src", "ES12", MoneyCents::new(-5), "rent"),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_transfer("src", "ES12", ok, "\t"),
            Err(ValidationError::MissingDescription)
        );
        assert!(validate_transfer("src", "ES12", ok, "rent").is_ok());
    }

    #[test]
    fn investment_rules() {
        assert!(validate_investment_buy("ACME", dec!(1.5), dec!(10)).is_ok());
        assert_eq!(
            validate_investment_buy("ACME", dec!(0), dec!(10)),
            Err(ValidationError::NonPositiveQuantity)
        );
        assert_eq!(
            validate_investment_buy("ACME", dec!(1), dec!(-1)),
            Err(ValidationError::NonPositivePrice)
        );
    }
}
