//! Errors raised by the domain layer.
//!
//! - [`InvalidAmount`] when a monetary value cannot be represented in cents.
//! - [`Mapping`] when a backend payload cannot be turned into the canonical
//!   model.
//!
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
//!  [`Mapping`]: LedgerError::Mapping
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unexpected payload: {0}")]
    Mapping(String),
}

pub type ResultLedger<T> = Result<T, LedgerError>;
