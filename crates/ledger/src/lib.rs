//! Domain layer of the finance dashboard client.
//!
//! Everything here is pure: fixed-point money, the canonical account model,
//! balance-history reconstruction, aggregation and form validation. The
//! authoritative ledger lives in the backend; nothing in this crate is ever
//! written back to it.

pub mod analytics;
mod error;
pub mod format;
pub mod history;
mod investment;
mod model;
mod money;
pub mod validation;

pub use analytics::{AccountBreakdown, AccountsSummary, breakdown, summarize};
pub use error::{LedgerError, ResultLedger};
pub use history::{DEFAULT_HISTORY_LEN, HistoryPoint};
pub use investment::{Investment, InvestmentStatus, Position};
pub use model::{Account, AccountKind, EntryKind, Transaction, TransactionEffect, TransactionLine};
pub use money::MoneyCents;
pub use validation::ValidationError;
