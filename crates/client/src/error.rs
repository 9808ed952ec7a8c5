use ledger::{LedgerError, ValidationError};
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a store action.
///
/// Status variants carry the message the backend put in the error body (or a
/// generic one when the body had none).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("ledger unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] LedgerError),
    #[error("{0}")]
    Form(#[from] ValidationError),
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Maps a non-2xx response to the matching variant.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| default_message(status));
        match status.as_u16() {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 | 422 => Self::Validation(message),
            other => Self::Server {
                status: other,
                message,
            },
        }
    }

    /// Text stored in a store's `error` field and shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the ledger".to_string(),
            Self::Decode(_) => "The ledger sent an unexpected response".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

fn default_message(status: StatusCode) -> String {
    match status.as_u16() {
        401 => "Invalid credentials".to_string(),
        403 => "Not allowed".to_string(),
        404 => "Not found".to_string(),
        _ => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("server error ({})", status.as_u16())),
    }
}
