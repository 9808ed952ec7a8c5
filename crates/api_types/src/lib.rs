//! Wire types of the ledger backend HTTP API.
//!
//! These mirror the JSON the backend sends and expects (camelCase keys).
//! They are deliberately loose: the backend has shipped several shapes for
//! the same resource, so most fields are optional here and the client maps
//! them into the canonical `ledger` model in one place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header carrying the client-generated idempotency key on write requests.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Error payload returned by the backend on non-2xx responses.
///
/// Most endpoints use `message`; a few older ones use `error`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterRequest {
        pub email: String,
        pub password: String,
        pub full_name: String,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserDto {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        /// Older backends call this `username`.
        #[serde(default, alias = "username")]
        pub full_name: Option<String>,
    }

    /// Response of `login` and `refresh`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AuthResponse {
        pub access_token: String,
        #[serde(default)]
        pub user: Option<UserDto>,
    }
}

pub mod account {
    use super::*;
    use crate::transaction::TransactionDto;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum AccountType {
        Asset,
        Liability,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountDto {
        pub id: String,
        pub account_number: String,
        pub balance: Decimal,
        #[serde(default, rename = "type")]
        pub kind: Option<AccountType>,
        #[serde(default)]
        pub active: Option<bool>,
        /// Some backend versions embed the account history directly.
        #[serde(default)]
        pub transactions: Option<Vec<TransactionDto>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountNew {
        pub account_number: String,
        #[serde(rename = "type")]
        pub kind: AccountType,
    }
}

pub mod transaction {
    use super::*;

    /// Direction of a transaction (or of one line) as seen by the account.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum OperationType {
        Credit,
        Debit,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionLineDto {
        pub account_id: String,
        pub amount: Decimal,
        #[serde(rename = "type")]
        pub kind: OperationType,
    }

    /// Transaction as returned by `GET /api/v1/transactions/{accountId}`.
    ///
    /// Either `lines` (double-entry) or `category` + `amount` (account-scoped)
    /// is populated. The timestamp arrives as `timestamp` or `date`, with or
    /// without an offset.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionDto {
        pub id: String,
        #[serde(default)]
        pub amount: Option<Decimal>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub timestamp: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
        #[serde(default)]
        pub category: Option<OperationType>,
        #[serde(default)]
        pub is_reversal: Option<bool>,
        #[serde(default)]
        pub lines: Option<Vec<TransactionLineDto>>,
    }
}

pub mod transfer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferByNumber {
        pub source_account_id: String,
        pub target_account_number: String,
        pub amount: Decimal,
        pub description: String,
    }
}

pub mod investment {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvestmentDto {
        pub id: String,
        pub symbol: String,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub quantity: Decimal,
        pub average_price: Decimal,
        pub current_price: Decimal,
        #[serde(default)]
        pub last_updated: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentBuy {
        pub symbol: String,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub quantity: Decimal,
        pub price: Decimal,
    }
}

pub mod analytics {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BalancePointDto {
        pub month: String,
        pub value: Decimal,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MonthlyFlowDto {
        pub month: String,
        pub income: Decimal,
        pub expenses: Decimal,
    }
}
