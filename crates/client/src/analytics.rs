//! Server-computed analytics (monthly series).
//!
//! The per-render aggregation over loaded accounts lives in
//! [`ledger::analytics`]; this store only mirrors what the backend computes.

use std::sync::Arc;

use ledger::{MoneyCents, ResultLedger};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{api::LedgerApi, convert, error::Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub month: String,
    pub value: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub income: MoneyCents,
    pub expenses: MoneyCents,
}

impl MonthlyFlow {
    pub fn net(&self) -> MoneyCents {
        self.income.saturating_sub(self.expenses)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyticsState {
    pub balance_history: Vec<BalancePoint>,
    pub monthly_flows: Vec<MonthlyFlow>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AnalyticsStore {
    api: Arc<dyn LedgerApi>,
    inner: Arc<RwLock<AnalyticsState>>,
}

impl AnalyticsStore {
    pub fn new(api: Arc<dyn LedgerApi>) -> Self {
        Self {
            api,
            inner: Arc::new(RwLock::new(AnalyticsState::default())),
        }
    }

    pub async fn snapshot(&self) -> AnalyticsState {
        self.inner.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.inner.write().await = AnalyticsState::default();
    }

    /// Loads both series concurrently; state changes only if both succeed.
    pub async fn fetch_analytics(&self) -> Result<()> {
        {
            let mut state = self.inner.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = self.load().await;

        let mut state = self.inner.write().await;
        state.is_loading = false;
        match result {
            Ok((balance_history, monthly_flows)) => {
                state.balance_history = balance_history;
                state.monthly_flows = monthly_flows;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("failed to fetch analytics: {err}");
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    async fn load(&self) -> Result<(Vec<BalancePoint>, Vec<MonthlyFlow>)> {
        let (history, flows) =
            tokio::try_join!(self.api.balance_history(), self.api.income_vs_expenses())?;
        let history = history
            .into_iter()
            .map(convert::balance_point)
            .collect::<ResultLedger<Vec<_>>>()?;
        let flows = flows
            .into_iter()
            .map(convert::monthly_flow)
            .collect::<ResultLedger<Vec<_>>>()?;
        Ok((history, flows))
    }
}
