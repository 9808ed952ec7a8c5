//! Client-side aggregation over the loaded accounts.
//!
//! Recomputed from scratch on every call; account lists are small and are
//! replaced wholesale on each fetch.

use serde::Serialize;

use crate::{Account, EntryKind, MoneyCents};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccountsSummary {
    pub total_balance: MoneyCents,
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
    /// `total_income - total_expenses`.
    pub net: MoneyCents,
    pub transaction_count: usize,
    pub account_count: usize,
}

/// Per-account line of the dashboard breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountBreakdown {
    pub account_id: String,
    pub short_number: String,
    pub balance: MoneyCents,
    pub transaction_count: usize,
}

/// Sums balances, credits and debits across `accounts`.
///
/// Income and expenses are taken from each transaction's effect on the
/// account it was loaded for.
#[must_use]
pub fn summarize(accounts: &[Account]) -> AccountsSummary {
    let mut summary = AccountsSummary {
        account_count: accounts.len(),
        ..AccountsSummary::default()
    };

    for account in accounts {
        summary.total_balance = summary.total_balance.saturating_add(account.balance);
        summary.transaction_count += account.transactions().len();

        for tx in account.transactions() {
            match tx.effect_on(&account.id) {
                Some((EntryKind::Credit, amount)) => {
                    summary.total_income = summary.total_income.saturating_add(amount);
                }
                Some((EntryKind::Debit, amount)) => {
                    summary.total_expenses = summary.total_expenses.saturating_add(amount);
                }
                None => {}
            }
        }
    }

    summary.net = summary.total_income.saturating_sub(summary.total_expenses);
    summary
}

#[must_use]
pub fn breakdown(accounts: &[Account]) -> Vec<AccountBreakdown> {
    accounts
        .iter()
        .map(|account| AccountBreakdown {
            account_id: account.id.clone(),
            short_number: account.short_number().to_string(),
            balance: account.balance,
            transaction_count: account.transactions().len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{AccountKind, Transaction, TransactionEffect};

    fn tx(kind: EntryKind, cents: i64) -> Transaction {
        Transaction {
            id: format!("{}-{cents}", kind.as_str()),
            description: String::new(),
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            is_reversal: false,
            effect: TransactionEffect::Single {
                kind,
                amount: MoneyCents::new(cents),
            },
        }
    }

    fn account(id: &str, balance: i64, txs: Option<Vec<Transaction>>) -> Account {
        Account {
            id: id.to_string(),
            account_number: format!("0000{id}"),
            balance: MoneyCents::new(balance),
            kind: AccountKind::Asset,
            active: true,
            transactions: txs,
        }
    }

    #[test]
    fn empty_accounts_sum_to_zero() {
        assert_eq!(summarize(&[]), AccountsSummary::default());
    }

    #[test]
    fn sums_income_expenses_and_counts() {
        let accounts = vec![
            account(
                "1",
                1_000_00,
                Some(vec![
                    tx(EntryKind::Credit, 500_00),
                    tx(EntryKind::Debit, 120_50),
                ]),
            ),
            account("2", 250_25, Some(vec![tx(EntryKind::Debit, 30_00)])),
            account("3", -50_00, None),
        ];

        let summary = summarize(&accounts);
        assert_eq!(summary.total_balance, MoneyCents::new(1_200_25));
        assert_eq!(summary.total_income, MoneyCents::new(500_00));
        assert_eq!(summary.total_expenses, MoneyCents::new(150_50));
        assert_eq!(summary.net, MoneyCents::new(349_50));
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.account_count, 3);
    }

    #[test]
    fn breakdown_lists_every_account() {
        let accounts = vec![account("12345", 10, None)];
        let rows = breakdown(&accounts);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].short_number, "2345");
        assert_eq!(rows[0].transaction_count, 0);
    }
}
