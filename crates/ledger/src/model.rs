//! Canonical account and transaction model.
//!
//! The backend has returned several shapes for the same resources; the client
//! maps all of them into these types at the API boundary so that nothing
//! above that layer branches on field presence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MoneyCents, history};

/// Direction of a balance change for the account it applies to.
///
/// A credit increases the account balance, a debit decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Credit,
    Debit,
}

impl EntryKind {
    /// Applies the direction to an unsigned amount.
    #[must_use]
    pub fn signed(self, amount: MoneyCents) -> MoneyCents {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

/// One account-scoped leg of a multi-account transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub account_id: String,
    /// Unsigned; the direction is carried by `kind`.
    pub amount: MoneyCents,
    pub kind: EntryKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionEffect {
    /// Account-scoped shape: the transaction was fetched for one account and
    /// carries that account's direction and unsigned amount.
    Single { kind: EntryKind, amount: MoneyCents },
    /// Double-entry shape: one line per touched account.
    Lines(Vec<TransactionLine>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
    pub is_reversal: bool,
    pub effect: TransactionEffect,
}

impl Transaction {
    /// Returns how this transaction changed the balance of `account_id`.
    ///
    /// Account-scoped transactions always apply. Multi-line transactions use
    /// the first line naming the account; `None` when no line matches.
    #[must_use]
    pub fn effect_on(&self, account_id: &str) -> Option<(EntryKind, MoneyCents)> {
        match &self.effect {
            TransactionEffect::Single { kind, amount } => Some((*kind, *amount)),
            TransactionEffect::Lines(lines) => lines
                .iter()
                .find(|line| line.account_id == account_id)
                .map(|line| (line.kind, line.amount)),
        }
    }

    /// Signed delta applied to `account_id`, zero when the account is not
    /// touched.
    #[must_use]
    pub fn delta_for(&self, account_id: &str) -> MoneyCents {
        self.effect_on(account_id)
            .map(|(kind, amount)| kind.signed(amount))
            .unwrap_or(MoneyCents::ZERO)
    }

    /// Whether the signed line amounts net to zero.
    ///
    /// Diagnostic only: the backend owns this invariant and the client never
    /// rejects data because of it. Account-scoped transactions have a single
    /// visible leg and are reported as balanced.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        match &self.effect {
            TransactionEffect::Single { .. } => true,
            TransactionEffect::Lines(lines) => lines
                .iter()
                .map(|line| line.kind.signed(line.amount))
                .sum::<MoneyCents>()
                .is_zero(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Asset,
    Liability,
}

impl AccountKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
        }
    }
}

/// Account as mirrored from the last successful backend response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub account_number: String,
    /// Server-authoritative balance.
    pub balance: MoneyCents,
    pub kind: AccountKind,
    pub active: bool,
    /// `None` when the history could not be loaded.
    pub transactions: Option<Vec<Transaction>>,
}

impl Account {
    /// Loaded transactions, empty when absent.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.as_deref().unwrap_or(&[])
    }

    /// Last four characters of the account number, for compact labels.
    #[must_use]
    pub fn short_number(&self) -> &str {
        let count = self.account_number.chars().count();
        let skip = count.saturating_sub(4);
        self.account_number
            .char_indices()
            .nth(skip)
            .map(|(idx, _)| &self.account_number[idx..])
            .unwrap_or("")
    }

    /// Estimated balance series for charting, oldest first, ending at the
    /// current balance. See [`history::reconstruct`].
    #[must_use]
    pub fn balance_history(&self, limit: usize) -> Vec<MoneyCents> {
        history::reconstruct(&self.id, self.balance, self.transactions(), limit)
    }
}
