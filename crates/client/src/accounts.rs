use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use api_types::{
    account::{AccountDto, AccountNew},
    transaction::TransactionDto,
    transfer::TransferByNumber,
};
use futures::future::try_join_all;
use ledger::{Account, AccountKind, MoneyCents, Transaction, validation};
use tokio::sync::RwLock;

use crate::{
    api::{IdempotencyKey, LedgerApi},
    convert,
    error::{ClientError, Result},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountsState {
    /// Mirror of the last successful fetch; empty until then.
    pub accounts: Vec<Account>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_account_id: String,
    pub target_account_number: String,
    pub amount: MoneyCents,
    pub description: String,
}

#[derive(Debug, Default)]
struct Inner {
    state: AccountsState,
    /// Ticket of the fetch whose result is currently shown.
    applied: u64,
}

/// Accounts of the logged-in user with their recent transactions.
///
/// There is no client-side ledger: every write is followed by a full
/// re-fetch and the list is only ever replaced as a whole.
#[derive(Clone)]
pub struct AccountStore {
    api: Arc<dyn LedgerApi>,
    inner: Arc<RwLock<Inner>>,
    tickets: Arc<AtomicU64>,
}

impl AccountStore {
    pub fn new(api: Arc<dyn LedgerApi>) -> Self {
        Self {
            api,
            inner: Arc::new(RwLock::new(Inner::default())),
            tickets: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> AccountsState {
        self.inner.read().await.state.clone()
    }

    pub async fn accounts(&self) -> Vec<Account> {
        self.inner.read().await.state.accounts.clone()
    }

    pub async fn account(&self, account_id: &str) -> Option<Account> {
        self.inner
            .read()
            .await
            .state
            .accounts
            .iter()
            .find(|account| account.id == account_id)
            .cloned()
    }

    /// Forgets every account. Fetches still in flight are discarded.
    pub async fn clear(&self) {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let mut inner = self.inner.write().await;
        inner.applied = ticket;
        inner.state = AccountsState::default();
    }

    /// Replaces the account list from the backend.
    ///
    /// On failure the previous list is kept and `error` is set.
    pub async fn fetch_accounts(&self) -> Result<()> {
        {
            let mut inner = self.inner.write().await;
            inner.state.is_loading = true;
            inner.state.error = None;
        }

        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.load().await;

        let mut inner = self.inner.write().await;
        inner.state.is_loading = false;
        match result {
            Ok(accounts) => {
                apply(&mut inner, ticket, accounts);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("failed to fetch accounts: {err}");
                if ticket < inner.applied {
                    tracing::debug!(ticket, applied = inner.applied, "discarding stale fetch error");
                } else {
                    inner.state.error = Some(err.user_message());
                }
                Err(err)
            }
        }
    }

    /// Background variant of [`fetch_accounts`](Self::fetch_accounts):
    /// failures are logged and never surface in the state.
    pub async fn refresh_accounts(&self) {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        match self.load().await {
            Ok(accounts) => {
                let mut inner = self.inner.write().await;
                apply(&mut inner, ticket, accounts);
            }
            Err(err) => tracing::warn!("background account refresh failed: {err}"),
        }
    }

    async fn load(&self) -> Result<Vec<Account>> {
        let dtos = self.api.accounts().await?;
        try_join_all(dtos.into_iter().map(|dto| self.load_account(dto))).await
    }

    async fn load_account(&self, mut dto: AccountDto) -> Result<Account> {
        let embedded = dto.transactions.take();
        let mut account = convert::account(dto)?;
        account.transactions = match embedded {
            Some(list) => readable(&account.id, list),
            None => self.load_transactions(&account.id).await,
        };
        Ok(account)
    }

    /// A failing history does not fail the whole fetch; the account is shown
    /// without transactions.
    async fn load_transactions(&self, account_id: &str) -> Option<Vec<Transaction>> {
        let dtos = match self.api.transactions(account_id).await {
            Ok(dtos) => dtos,
            Err(err) => {
                tracing::warn!(account_id, "failed to load transactions: {err}");
                return None;
            }
        };
        readable(account_id, dtos)
    }

    async fn record_failure(&self, action: &str, err: &ClientError) {
        tracing::warn!("{action} failed: {err}");
        self.inner.write().await.state.error = Some(err.user_message());
    }

    /// Re-fetch after a successful write. The write itself succeeded, so a
    /// failing re-fetch is only recorded in the state.
    async fn reconcile(&self) {
        if let Err(err) = self.fetch_accounts().await {
            tracing::warn!("re-fetch after write failed: {err}");
        }
    }

    pub async fn execute_transfer(&self, request: TransferRequest) -> Result<()> {
        validation::validate_transfer(
            &request.source_account_id,
            &request.target_account_number,
            request.amount,
            &request.description,
        )?;

        let payload = TransferByNumber {
            source_account_id: request.source_account_id,
            target_account_number: request.target_account_number.trim().to_string(),
            amount: request.amount.to_decimal(),
            description: request.description.trim().to_string(),
        };
        let key = IdempotencyKey::new();

        match self.api.transfer(&payload, key).await {
            Ok(()) => {
                tracing::info!(
                    %key,
                    source = %payload.source_account_id,
                    target = %payload.target_account_number,
                    amount = %request.amount,
                    "transfer accepted"
                );
                self.reconcile().await;
                Ok(())
            }
            Err(err) => {
                self.record_failure("transfer", &err).await;
                Err(err)
            }
        }
    }

    pub async fn create_account(&self, account_number: &str, kind: AccountKind) -> Result<()> {
        validation::validate_new_account(account_number)?;

        let payload = AccountNew {
            account_number: account_number.trim().to_string(),
            kind: convert::account_type(kind),
        };
        match self.api.create_account(&payload, IdempotencyKey::new()).await {
            Ok(()) => {
                tracing::info!(account_number = %payload.account_number, "account created");
                self.reconcile().await;
                Ok(())
            }
            Err(err) => {
                self.record_failure("account creation", &err).await;
                Err(err)
            }
        }
    }

    pub async fn delete_account(&self, account_id: &str) -> Result<()> {
        match self
            .api
            .delete_account(account_id, IdempotencyKey::new())
            .await
        {
            Ok(()) => {
                tracing::info!(account_id, "account deleted");
                self.reconcile().await;
                Ok(())
            }
            Err(err) => {
                self.record_failure("account deletion", &err).await;
                Err(err)
            }
        }
    }
}

fn readable(account_id: &str, dtos: Vec<TransactionDto>) -> Option<Vec<Transaction>> {
    match convert::transactions(dtos) {
        Ok(transactions) => Some(transactions),
        Err(err) => {
            tracing::warn!(account_id, "unreadable transactions: {err}");
            None
        }
    }
}

/// Installs `accounts` unless a later fetch has already been applied.
fn apply(inner: &mut Inner, ticket: u64, accounts: Vec<Account>) {
    if ticket < inner.applied {
        tracing::debug!(ticket, applied = inner.applied, "discarding stale account fetch");
        return;
    }
    inner.applied = ticket;
    inner.state.accounts = accounts;
}
