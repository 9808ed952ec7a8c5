//! Client-side core of the finboard dashboard: backend access, the adapter
//! from wire DTOs to the canonical ledger model, and the stores the front end
//! reads from.

pub mod accounts;
pub mod alerts;
pub mod analytics;
pub mod api;
mod convert;
pub mod error;
pub mod investments;
pub mod poller;
pub mod session;
pub mod ui;

use std::sync::Arc;

pub use accounts::{AccountStore, AccountsState, TransferRequest};
pub use alerts::{Alert, AlertId, AlertLevel, AlertStore, DEFAULT_AUTO_CLOSE};
pub use analytics::{AnalyticsState, AnalyticsStore, BalancePoint, MonthlyFlow};
pub use api::{HttpApi, IdempotencyKey, LedgerApi};
pub use error::{ClientError, Result};
pub use investments::{InvestmentStore, InvestmentsState, NewInvestment};
pub use poller::{DEFAULT_POLL_INTERVAL, Poller};
pub use session::{SessionPhase, SessionState, SessionStore, UserProfile};
pub use ui::UiStore;

/// Every store, sharing one backend handle.
#[derive(Clone)]
pub struct Stores {
    pub session: SessionStore,
    pub accounts: AccountStore,
    pub alerts: AlertStore,
    pub investments: InvestmentStore,
    pub analytics: AnalyticsStore,
    pub ui: UiStore,
}

impl Stores {
    pub fn new(api: Arc<dyn LedgerApi>) -> Self {
        Self {
            session: SessionStore::new(api.clone()),
            accounts: AccountStore::new(api.clone()),
            alerts: AlertStore::new(),
            investments: InvestmentStore::new(api.clone()),
            analytics: AnalyticsStore::new(api),
            ui: UiStore::default(),
        }
    }

    /// Connects to `base_url` over HTTP.
    pub fn connect(base_url: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpApi::new(base_url)?)))
    }

    /// Logs out and drops every user-scoped mirror.
    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.accounts.clear().await;
        self.investments.clear().await;
        self.analytics.clear().await;
        self.alerts.clear_alerts().await;
    }
}
