use std::sync::Arc;

use api_types::investment::InvestmentBuy;
use ledger::{Investment, ResultLedger, validation};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::{
    api::{IdempotencyKey, LedgerApi},
    convert,
    error::Result,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvestmentsState {
    pub investments: Vec<Investment>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInvestment {
    pub symbol: String,
    pub name: String,
    pub kind: String,
    pub quantity: Decimal,
    /// Entry price per unit.
    pub price: Decimal,
}

#[derive(Clone)]
pub struct InvestmentStore {
    api: Arc<dyn LedgerApi>,
    inner: Arc<RwLock<InvestmentsState>>,
}

impl InvestmentStore {
    pub fn new(api: Arc<dyn LedgerApi>) -> Self {
        Self {
            api,
            inner: Arc::new(RwLock::new(InvestmentsState::default())),
        }
    }

    pub async fn snapshot(&self) -> InvestmentsState {
        self.inner.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.inner.write().await = InvestmentsState::default();
    }

    /// Loads positions and derives their values.
    pub async fn fetch_investments(&self) -> Result<()> {
        {
            let mut state = self.inner.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = match self.api.investments().await {
            Ok(dtos) => dtos
                .into_iter()
                .map(convert::investment)
                .collect::<ResultLedger<Vec<_>>>()
                .map_err(Into::into),
            Err(err) => Err(err),
        };

        let mut state = self.inner.write().await;
        state.is_loading = false;
        match result {
            Ok(investments) => {
                state.investments = investments;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("failed to fetch investments: {err}");
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub async fn add_investment(&self, investment: NewInvestment) -> Result<()> {
        validation::validate_investment_buy(
            &investment.symbol,
            investment.quantity,
            investment.price,
        )?;

        let payload = InvestmentBuy {
            symbol: investment.symbol.trim().to_uppercase(),
            name: investment.name.trim().to_string(),
            kind: investment.kind,
            quantity: investment.quantity,
            price: investment.price,
        };

        match self
            .api
            .buy_investment(&payload, IdempotencyKey::new())
            .await
        {
            Ok(()) => {
                tracing::info!(symbol = %payload.symbol, quantity = %payload.quantity, "investment registered");
                if let Err(err) = self.fetch_investments().await {
                    tracing::warn!("re-fetch after investment failed: {err}");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!("investment registration failed: {err}");
                self.inner.write().await.error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
