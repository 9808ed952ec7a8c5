use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{LedgerError, MoneyCents, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum InvestmentStatus {
    Active,
    Closed,
}

/// Fields stored by the backend for a position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub kind: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A position together with the values derived from it on every fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Investment {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub kind: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
    pub last_updated: Option<DateTime<Utc>>,
    pub amount_invested: MoneyCents,
    pub current_value: MoneyCents,
    /// Return on investment in percent, two decimals.
    pub roi_percent: Decimal,
    pub status: InvestmentStatus,
}

impl Investment {
    pub fn profit(&self) -> MoneyCents {
        self.current_value.saturating_sub(self.amount_invested)
    }
}

fn value_of(quantity: Decimal, price: Decimal) -> ResultLedger<MoneyCents> {
    let value = quantity
        .checked_mul(price)
        .ok_or_else(|| LedgerError::InvalidAmount("position value too large".to_string()))?;
    MoneyCents::try_from(value.round_dp(2))
}

impl TryFrom<Position> for Investment {
    type Error = LedgerError;

    fn try_from(position: Position) -> Result<Self, Self::Error> {
        let amount_invested = value_of(position.quantity, position.average_price)?;
        let current_value = value_of(position.quantity, position.current_price)?;

        let roi_percent = if amount_invested.is_positive() {
            let profit = current_value.saturating_sub(amount_invested).to_decimal();
            profit
                .checked_div(amount_invested.to_decimal())
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|pct| pct.round_dp(2))
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let status = if position.quantity > Decimal::ZERO {
            InvestmentStatus::Active
        } else {
            InvestmentStatus::Closed
        };

        Ok(Self {
            id: position.id,
            symbol: position.symbol,
            name: position.name,
            kind: position.kind,
            quantity: position.quantity,
            average_price: position.average_price,
            current_price: position.current_price,
            last_updated: position.last_updated,
            amount_invested,
            current_value,
            roi_percent,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn position(quantity: Decimal, average: Decimal, current: Decimal) -> Position {
        Position {
            id: "p1".to_string(),
            symbol: "ACME".to_string(),
            name: "Acme Corp".to_string(),
            kind: "STOCK".to_string(),
            quantity,
            average_price: average,
            current_price: current,
            last_updated: None,
        }
    }

    #[test]
    fn derives_value_and_roi() {
        let inv = Investment::try_from(position(dec!(10), dec!(100), dec!(112.5))).unwrap();
        assert_eq!(inv.amount_invested, MoneyCents::new(1_000_00));
        assert_eq!(inv.current_value, MoneyCents::new(1_125_00));
        assert_eq!(inv.roi_percent, dec!(12.50));
        assert_eq!(inv.profit(), MoneyCents::new(125_00));
        assert_eq!(inv.status, InvestmentStatus::Active);
    }

    #[test]
    fn fractional_quantities_round_to_cents() {
        let inv = Investment::try_from(position(dec!(0.333), dec!(10), dec!(9))).unwrap();
        assert_eq!(inv.amount_invested, MoneyCents::new(3_33));
        assert_eq!(inv.current_value, MoneyCents::new(3_00));
        assert_eq!(inv.roi_percent, dec!(-9.91));
    }

    #[test]
    fn empty_position_is_closed_with_zero_roi() {
        let inv = Investment::try_from(position(dec!(0), dec!(50), dec!(60))).unwrap();
        assert_eq!(inv.status, InvestmentStatus::Closed);
        assert_eq!(inv.roi_percent, Decimal::ZERO);
        assert!(inv.amount_invested.is_zero());
    }
}
