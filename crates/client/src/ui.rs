use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use ledger::{MoneyCents, format};

/// Presentation preferences shared by every view.
#[derive(Clone, Debug, Default)]
pub struct UiStore {
    privacy_mode: Arc<AtomicBool>,
}

impl UiStore {
    pub fn new(privacy_mode: bool) -> Self {
        Self {
            privacy_mode: Arc::new(AtomicBool::new(privacy_mode)),
        }
    }

    pub fn is_privacy_mode(&self) -> bool {
        self.privacy_mode.load(Ordering::Relaxed)
    }

    /// Flips privacy mode and returns the new value.
    pub fn toggle_privacy(&self) -> bool {
        !self.privacy_mode.fetch_xor(true, Ordering::Relaxed)
    }

    /// Formats an amount, masked while privacy mode is on. Underlying data is
    /// never touched.
    pub fn format_amount(&self, amount: MoneyCents) -> String {
        format::format_amount(amount, self.is_privacy_mode())
    }
}
