//! Mapping from wire types to the canonical `ledger` model.
//!
//! This is the only place aware of the backend's alternative shapes:
//! `timestamp` vs `date`, `lines` vs flat `category`/`amount`, signed vs
//! unsigned amounts.

use api_types::{
    account::{AccountDto, AccountType},
    analytics::{BalancePointDto, MonthlyFlowDto},
    auth::UserDto,
    investment::InvestmentDto,
    transaction::{OperationType, TransactionDto, TransactionLineDto},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ledger::{
    Account, AccountKind, EntryKind, Investment, LedgerError, MoneyCents, Position, ResultLedger,
    Transaction, TransactionEffect, TransactionLine,
};

use crate::{
    analytics::{BalancePoint, MonthlyFlow},
    session::UserProfile,
};

pub(crate) fn entry_kind(kind: OperationType) -> EntryKind {
    match kind {
        OperationType::Credit => EntryKind::Credit,
        OperationType::Debit => EntryKind::Debit,
    }
}

pub(crate) fn account_kind(kind: AccountType) -> AccountKind {
    match kind {
        AccountType::Asset => AccountKind::Asset,
        AccountType::Liability => AccountKind::Liability,
    }
}

pub(crate) fn account_type(kind: AccountKind) -> AccountType {
    match kind {
        AccountKind::Asset => AccountType::Asset,
        AccountKind::Liability => AccountType::Liability,
    }
}

/// Parses the timestamp formats seen from the backend.
///
/// Accepts RFC 3339, offset-less ISO date-times (read as UTC) and bare dates
/// (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn line(dto: TransactionLineDto) -> ResultLedger<TransactionLine> {
    Ok(TransactionLine {
        account_id: dto.account_id,
        amount: MoneyCents::try_from(dto.amount)?.abs(),
        kind: entry_kind(dto.kind),
    })
}

pub(crate) fn transaction(dto: TransactionDto) -> ResultLedger<Transaction> {
    let occurred_at = dto
        .timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| dto.date.as_deref().and_then(parse_timestamp))
        .ok_or_else(|| {
            LedgerError::Mapping(format!("transaction {} has no usable timestamp", dto.id))
        })?;

    let effect = match (dto.lines, dto.category, dto.amount) {
        (Some(lines), _, _) if !lines.is_empty() => TransactionEffect::Lines(
            lines
                .into_iter()
                .map(line)
                .collect::<ResultLedger<Vec<_>>>()?,
        ),
        (_, Some(category), Some(amount)) => TransactionEffect::Single {
            kind: entry_kind(category),
            amount: MoneyCents::try_from(amount)?.abs(),
        },
        _ => {
            return Err(LedgerError::Mapping(format!(
                "transaction {} has neither lines nor category and amount",
                dto.id
            )));
        }
    };

    Ok(Transaction {
        id: dto.id,
        description: dto.description.unwrap_or_default(),
        occurred_at,
        is_reversal: dto.is_reversal.unwrap_or(false),
        effect,
    })
}

pub(crate) fn transactions(dtos: Vec<TransactionDto>) -> ResultLedger<Vec<Transaction>> {
    dtos.into_iter().map(transaction).collect()
}

/// Maps an account, including its embedded transactions when present.
pub(crate) fn account(dto: AccountDto) -> ResultLedger<Account> {
    let transactions = dto.transactions.map(transactions).transpose()?;
    Ok(Account {
        id: dto.id,
        account_number: dto.account_number,
        balance: MoneyCents::try_from(dto.balance)?,
        kind: dto.kind.map(account_kind).unwrap_or_default(),
        active: dto.active.unwrap_or(true),
        transactions,
    })
}

pub(crate) fn investment(dto: InvestmentDto) -> ResultLedger<Investment> {
    Investment::try_from(Position {
        last_updated: dto.last_updated.as_deref().and_then(parse_timestamp),
        id: dto.id,
        symbol: dto.symbol,
        name: dto.name,
        kind: dto.kind,
        quantity: dto.quantity,
        average_price: dto.average_price,
        current_price: dto.current_price,
    })
}

pub(crate) fn balance_point(dto: BalancePointDto) -> ResultLedger<BalancePoint> {
    Ok(BalancePoint {
        month: dto.month,
        value: MoneyCents::try_from(dto.value)?,
    })
}

pub(crate) fn monthly_flow(dto: MonthlyFlowDto) -> ResultLedger<MonthlyFlow> {
    Ok(MonthlyFlow {
        month: dto.month,
        income: MoneyCents::try_from(dto.income)?,
        expenses: MoneyCents::try_from(dto.expenses)?,
    })
}

pub(crate) fn user(dto: UserDto) -> UserProfile {
    UserProfile {
        id: dto.id,
        email: dto.email,
        full_name: dto.full_name,
    }
}
