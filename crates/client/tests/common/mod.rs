#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use api_types::{
    account::{AccountDto, AccountNew, AccountType},
    analytics::{BalancePointDto, MonthlyFlowDto},
    auth::{AuthResponse, LoginRequest, RegisterRequest, UserDto},
    investment::{InvestmentBuy, InvestmentDto},
    transaction::{OperationType, TransactionDto},
    transfer::TransferByNumber,
};
use async_trait::async_trait;
use client::{ClientError, IdempotencyKey, LedgerApi, Result};
use reqwest::StatusCode;
use rust_decimal::Decimal;

pub const PASSWORD: &str = "secret123";

/// In-memory backend. Writes mutate the stored DTOs, so a re-fetch observes
/// them the way it would against the real ledger.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub struct FakeState {
    pub accounts: Vec<AccountDto>,
    pub transactions: HashMap<String, Vec<TransactionDto>>,
    pub investments: Vec<InvestmentDto>,
    pub balance_history: Vec<BalancePointDto>,
    pub monthly_flows: Vec<MonthlyFlowDto>,
    /// Scripted `accounts()` replies, served before the live list. An `Err`
    /// holds the status and message to fail with.
    pub scripted_accounts: VecDeque<(Duration, std::result::Result<Vec<AccountDto>, (u16, &'static str)>)>,
    failures: HashMap<&'static str, (u16, &'static str)>,
    calls: HashMap<&'static str, usize>,
    pub token: Option<String>,
    pub idempotency_keys: Vec<IdempotencyKey>,
    pub has_refresh_cookie: bool,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_accounts(accounts: Vec<AccountDto>) -> Arc<Self> {
        let api = Self::default();
        api.state().accounts = accounts;
        Arc::new(api)
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Makes every later call of `op` fail with `status`.
    pub fn fail(&self, op: &'static str, status: u16, message: &'static str) {
        self.state().failures.insert(op, (status, message));
    }

    pub fn recover(&self, op: &'static str) {
        self.state().failures.remove(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.state().calls.get(op).copied().unwrap_or(0)
    }

    fn hit(&self, op: &'static str) -> Result<()> {
        let mut state = self.state();
        *state.calls.entry(op).or_default() += 1;
        match state.failures.get(op) {
            Some(&(status, message)) => Err(ClientError::from_status(
                StatusCode::from_u16(status).unwrap(),
                Some(message.to_string()),
            )),
            None => Ok(()),
        }
    }

    fn auth(email: &str) -> AuthResponse {
        AuthResponse {
            access_token: format!("token-for-{email}"),
            user: Some(UserDto {
                id: Some("u-1".to_string()),
                email: Some(email.to_string()),
                full_name: Some("Ada Lovelace".to_string()),
            }),
        }
    }
}

#[async_trait]
impl LedgerApi for FakeApi {
    fn set_access_token(&self, token: Option<String>) {
        self.state().token = token;
    }

    async fn login(&self, payload: &LoginRequest) -> Result<AuthResponse> {
        self.hit("login")?;
        if payload.password != PASSWORD {
            return Err(ClientError::from_status(StatusCode::UNAUTHORIZED, None));
        }
        self.state().has_refresh_cookie = true;
        Ok(Self::auth(&payload.email))
    }

    async fn refresh(&self) -> Result<AuthResponse> {
        self.hit("refresh")?;
        if !self.state().has_refresh_cookie {
            return Err(ClientError::from_status(StatusCode::UNAUTHORIZED, None));
        }
        Ok(Self::auth("ada@example.com"))
    }

    async fn register(&self, _payload: &RegisterRequest, key: IdempotencyKey) -> Result<()> {
        self.hit("register")?;
        self.state().idempotency_keys.push(key);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.hit("logout")?;
        self.state().has_refresh_cookie = false;
        Ok(())
    }

    async fn accounts(&self) -> Result<Vec<AccountDto>> {
        self.hit("accounts")?;
        let scripted = self.state().scripted_accounts.pop_front();
        match scripted {
            Some((delay, reply)) => {
                tokio::time::sleep(delay).await;
                reply.map_err(|(status, message)| {
                    ClientError::from_status(
                        StatusCode::from_u16(status).unwrap(),
                        Some(message.to_string()),
                    )
                })
            }
            None => Ok(self.state().accounts.clone()),
        }
    }

    async fn transactions(&self, account_id: &str) -> Result<Vec<TransactionDto>> {
        self.hit("transactions")?;
        Ok(self
            .state()
            .transactions
            .get(account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn transfer(&self, payload: &TransferByNumber, key: IdempotencyKey) -> Result<()> {
        self.hit("transfer")?;
        let mut state = self.state();
        state.idempotency_keys.push(key);
        let Some(target) = state
            .accounts
            .iter()
            .position(|account| account.account_number == payload.target_account_number)
        else {
            return Err(ClientError::from_status(
                StatusCode::NOT_FOUND,
                Some("Target account not found".to_string()),
            ));
        };
        let Some(source) = state
            .accounts
            .iter()
            .position(|account| account.id == payload.source_account_id)
        else {
            return Err(ClientError::from_status(StatusCode::NOT_FOUND, None));
        };
        if state.accounts[source].balance < payload.amount {
            return Err(ClientError::from_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                Some("Insufficient funds".to_string()),
            ));
        }
        state.accounts[source].balance -= payload.amount;
        state.accounts[target].balance += payload.amount;
        Ok(())
    }

    async fn create_account(&self, payload: &AccountNew, key: IdempotencyKey) -> Result<()> {
        self.hit("create_account")?;
        let mut state = self.state();
        state.idempotency_keys.push(key);
        let id = format!("acc-{}", state.accounts.len() + 1);
        let mut dto = account(&id, &payload.account_number, Decimal::ZERO);
        dto.kind = Some(payload.kind);
        state.accounts.push(dto);
        Ok(())
    }

    async fn delete_account(&self, account_id: &str, key: IdempotencyKey) -> Result<()> {
        self.hit("delete_account")?;
        let mut state = self.state();
        state.idempotency_keys.push(key);
        let before = state.accounts.len();
        state.accounts.retain(|account| account.id != account_id);
        if state.accounts.len() == before {
            return Err(ClientError::from_status(StatusCode::NOT_FOUND, None));
        }
        Ok(())
    }

    async fn investments(&self) -> Result<Vec<InvestmentDto>> {
        self.hit("investments")?;
        Ok(self.state().investments.clone())
    }

    async fn buy_investment(&self, payload: &InvestmentBuy, key: IdempotencyKey) -> Result<()> {
        self.hit("buy_investment")?;
        let mut state = self.state();
        state.idempotency_keys.push(key);
        let id = format!("inv-{}", state.investments.len() + 1);
        state.investments.push(InvestmentDto {
            id,
            symbol: payload.symbol.clone(),
            name: payload.name.clone(),
            kind: payload.kind.clone(),
            quantity: payload.quantity,
            average_price: payload.price,
            current_price: payload.price,
            last_updated: None,
        });
        Ok(())
    }

    async fn balance_history(&self) -> Result<Vec<BalancePointDto>> {
        self.hit("balance_history")?;
        Ok(self.state().balance_history.clone())
    }

    async fn income_vs_expenses(&self) -> Result<Vec<MonthlyFlowDto>> {
        self.hit("income_vs_expenses")?;
        Ok(self.state().monthly_flows.clone())
    }
}

pub fn account(id: &str, number: &str, balance: Decimal) -> AccountDto {
    AccountDto {
        id: id.to_string(),
        account_number: number.to_string(),
        balance,
        kind: Some(AccountType::Asset),
        active: Some(true),
        transactions: None,
    }
}

pub fn flat_tx(id: &str, category: OperationType, amount: Decimal, timestamp: &str) -> TransactionDto {
    TransactionDto {
        id: id.to_string(),
        amount: Some(amount),
        description: Some(format!("tx {id}")),
        timestamp: Some(timestamp.to_string()),
        date: None,
        category: Some(category),
        is_reversal: None,
        lines: None,
    }
}
