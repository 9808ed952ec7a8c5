use client::ClientError;
use ledger::LedgerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
    #[error("invalid input: {0}")]
    Input(#[from] LedgerError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not logged in: {0}")]
    Credentials(String),
    #[error("no account with id {0}")]
    UnknownAccount(String),
}
