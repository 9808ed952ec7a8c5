//! Balance-history reconstruction.
//!
//! The backend only reports the current balance of an account. For charting,
//! the client estimates earlier balances by walking the most recent
//! transactions backwards from that value:
//!
//! - a credit increased the balance, so the balance before it was lower;
//! - a debit decreased the balance, so the balance before it was higher.
//!
//! The result is an estimate for display only. It is never fed back into any
//! store or request.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{EntryKind, MoneyCents, Transaction};

/// Number of transactions considered by the dashboard charts.
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// One point of a reconstructed series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryPoint {
    /// Timestamp of the transaction that produced this balance; `None` for the
    /// oldest estimate, which predates the considered window.
    pub as_of: Option<DateTime<Utc>>,
    pub balance: MoneyCents,
}

/// Reconstructs the balance series of `account_id`, oldest first.
///
/// Only the `limit` most recent transactions (by `occurred_at`) are walked.
/// Transactions that do not touch the account are skipped and add no point.
/// The last element is always `current`; an empty input yields `[current]`.
#[must_use]
pub fn reconstruct(
    account_id: &str,
    current: MoneyCents,
    transactions: &[Transaction],
    limit: usize,
) -> Vec<MoneyCents> {
    reconstruct_points(account_id, current, transactions, limit)
        .into_iter()
        .map(|point| point.balance)
        .collect()
}

/// Same as [`reconstruct`], keeping the timestamp each balance is valid from.
#[must_use]
pub fn reconstruct_points(
    account_id: &str,
    current: MoneyCents,
    transactions: &[Transaction],
    limit: usize,
) -> Vec<HistoryPoint> {
    let mut recent: Vec<&Transaction> = transactions.iter().collect();
    // Stable: ties keep the backend order.
    recent.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    recent.truncate(limit);

    let applied: Vec<(DateTime<Utc>, EntryKind, MoneyCents)> = recent
        .into_iter()
        .filter_map(|tx| {
            tx.effect_on(account_id)
                .map(|(kind, amount)| (tx.occurred_at, kind, amount))
        })
        .collect();

    let mut points = VecDeque::with_capacity(applied.len() + 1);
    let mut running = current;
    points.push_front(HistoryPoint {
        as_of: applied.first().map(|(at, _, _)| *at),
        balance: running,
    });

    for (idx, (_, kind, amount)) in applied.iter().enumerate() {
        running = match kind {
            EntryKind::Credit => running.saturating_sub(*amount),
            EntryKind::Debit => running.saturating_add(*amount),
        };
        points.push_front(HistoryPoint {
            as_of: applied.get(idx + 1).map(|(at, _, _)| *at),
            balance: running,
        });
    }

    points.into()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{TransactionEffect, TransactionLine};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn single(id: &str, minutes_ago: i64, kind: EntryKind, cents: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: id.to_string(),
            occurred_at: base() - Duration::minutes(minutes_ago),
            is_reversal: false,
            effect: TransactionEffect::Single {
                kind,
                amount: MoneyCents::new(cents),
            },
        }
    }

    fn cents(values: &[i64]) -> Vec<MoneyCents> {
        values.iter().copied().map(MoneyCents::new).collect()
    }

    #[test]
    fn empty_input_yields_current_balance() {
        let out = reconstruct("a", MoneyCents::new(12_345), &[], DEFAULT_HISTORY_LEN);
        assert_eq!(out, cents(&[12_345]));
    }

    #[test]
    fn single_credit_is_reversed() {
        let txs = [single("t1", 1, EntryKind::Credit, 200_00)];
        let out = reconstruct("a", MoneyCents::new(1000_00), &txs, DEFAULT_HISTORY_LEN);
        assert_eq!(out, cents(&[800_00, 1000_00]));
    }

    #[test]
    fn debit_then_older_credit() {
        let txs = [
            single("debit", 1, EntryKind::Debit, 150_00),
            single("credit", 2, EntryKind::Credit, 300_00),
        ];
        let out = reconstruct("a", MoneyCents::new(500_00), &txs, DEFAULT_HISTORY_LEN);
        assert_eq!(out, cents(&[350_00, 650_00, 500_00]));
    }

    #[test]
    fn input_order_does_not_matter_only_timestamps() {
        let txs = [
            single("credit", 2, EntryKind::Credit, 300_00),
            single("debit", 1, EntryKind::Debit, 150_00),
        ];
        let out = reconstruct("a", MoneyCents::new(500_00), &txs, DEFAULT_HISTORY_LEN);
        assert_eq!(out, cents(&[350_00, 650_00, 500_00]));
    }

    #[test]
    fn chronology_changes_intermediate_values() {
        let newer_small = [
            single("x", 1, EntryKind::Credit, 100),
            single("y", 2, EntryKind::Credit, 300),
        ];
        let newer_large = [
            single("x", 2, EntryKind::Credit, 100),
            single("y", 1, EntryKind::Credit, 300),
        ];
        let a = reconstruct("a", MoneyCents::new(1_000), &newer_small, 10);
        let b = reconstruct("a", MoneyCents::new(1_000), &newer_large, 10);
        assert_eq!(a[0], b[0]);
        assert_ne!(a[1], b[1]);
        assert_eq!(a[2], b[2]);
    }

    #[test]
    fn alternating_effects_keep_length_and_last_value() {
        for count in 0..=10usize {
            let txs: Vec<Transaction> = (0..count)
                .map(|i| {
                    let kind = if i % 2 == 0 {
                        EntryKind::Credit
                    } else {
                        EntryKind::Debit
                    };
                    single(&format!("t{i}"), i as i64 + 1, kind, 1_01 * (i as i64 + 1))
                })
                .collect();
            let current = MoneyCents::new(-7_33);
            let out = reconstruct("a", current, &txs, DEFAULT_HISTORY_LEN);
            assert_eq!(out.len(), count + 1);
            assert_eq!(*out.last().unwrap(), current);
        }
    }

    #[test]
    fn only_limit_most_recent_are_walked() {
        let txs: Vec<Transaction> = (0..15)
            .map(|i| single(&format!("t{i}"), i + 1, EntryKind::Credit, 100))
            .collect();
        let out = reconstruct("a", MoneyCents::new(10_000), &txs, DEFAULT_HISTORY_LEN);
        assert_eq!(out.len(), DEFAULT_HISTORY_LEN + 1);
        assert_eq!(out[0], MoneyCents::new(9_000));
    }

    #[test]
    fn lines_for_other_accounts_are_skipped() {
        let foreign = Transaction {
            id: "foreign".to_string(),
            description: String::new(),
            occurred_at: base(),
            is_reversal: false,
            effect: TransactionEffect::Lines(vec![TransactionLine {
                account_id: "b".to_string(),
                amount: MoneyCents::new(999),
                kind: EntryKind::Credit,
            }]),
        };
        let own = Transaction {
            id: "own".to_string(),
            description: String::new(),
            occurred_at: base() - Duration::minutes(5),
            is_reversal: false,
            effect: TransactionEffect::Lines(vec![
                TransactionLine {
                    account_id: "a".to_string(),
                    amount: MoneyCents::new(250),
                    kind: EntryKind::Debit,
                },
                TransactionLine {
                    account_id: "b".to_string(),
                    amount: MoneyCents::new(250),
                    kind: EntryKind::Credit,
                },
            ]),
        };
        let out = reconstruct("a", MoneyCents::new(1_000), &[foreign, own], 10);
        assert_eq!(out, cents(&[1_250, 1_000]));
    }

    #[test]
    fn points_carry_transaction_timestamps() {
        let txs = [
            single("newest", 1, EntryKind::Credit, 100),
            single("older", 2, EntryKind::Debit, 50),
        ];
        let points = reconstruct_points("a", MoneyCents::new(1_000), &txs, 10);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].as_of, None);
        assert_eq!(points[1].as_of, Some(txs[1].occurred_at));
        assert_eq!(points[2].as_of, Some(txs[0].occurred_at));
        assert_eq!(points[0].balance, MoneyCents::new(950));
    }
}
