//! Backend access.
//!
//! Stores talk to the backend only through [`LedgerApi`], so tests can swap
//! the HTTP implementation for an in-memory one.

use std::{fmt, sync::RwLock};

use api_types::{
    ErrorBody, IDEMPOTENCY_KEY_HEADER,
    account::{AccountDto, AccountNew},
    analytics::{BalancePointDto, MonthlyFlowDto},
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    investment::{InvestmentBuy, InvestmentDto},
    transaction::TransactionDto,
    transfer::TransferByNumber,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Client-generated token attached to write requests so a retried request is
/// applied at most once by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Sets (or clears) the bearer token attached to subsequent requests.
    fn set_access_token(&self, token: Option<String>);

    async fn login(&self, payload: &LoginRequest) -> Result<AuthResponse>;
    /// Exchanges the refresh cookie held by the HTTP client for a new token.
    async fn refresh(&self) -> Result<AuthResponse>;
    async fn register(&self, payload: &RegisterRequest, key: IdempotencyKey) -> Result<()>;
    async fn logout(&self) -> Result<()>;

    async fn accounts(&self) -> Result<Vec<AccountDto>>;
    async fn transactions(&self, account_id: &str) -> Result<Vec<TransactionDto>>;
    async fn transfer(&self, payload: &TransferByNumber, key: IdempotencyKey) -> Result<()>;
    async fn create_account(&self, payload: &AccountNew, key: IdempotencyKey) -> Result<()>;
    async fn delete_account(&self, account_id: &str, key: IdempotencyKey) -> Result<()>;

    async fn investments(&self) -> Result<Vec<InvestmentDto>>;
    async fn buy_investment(&self, payload: &InvestmentBuy, key: IdempotencyKey) -> Result<()>;

    async fn balance_history(&self) -> Result<Vec<BalancePointDto>>;
    async fn income_vs_expenses(&self) -> Result<Vec<MonthlyFlowDto>>;
}

/// [`LedgerApi`] over HTTP.
///
/// The refresh token lives in an httpOnly cookie, so the underlying client
/// keeps a cookie store; the access token is held here and sent as a bearer
/// header.
#[derive(Debug)]
pub struct HttpApi {
    base_url: String,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match self.bearer() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn write(&self, method: Method, path: &str, key: IdempotencyKey) -> RequestBuilder {
        self.request(method, path)
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }
        Err(error_from_response(res).await)
    }

    async fn send_unit(&self, req: RequestBuilder) -> Result<()> {
        let res = req.send().await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from_response(res).await)
    }
}

async fn error_from_response(res: reqwest::Response) -> ClientError {
    let status = res.status();
    let message = res
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message);
    tracing::debug!(status = status.as_u16(), ?message, "backend rejected request");
    ClientError::from_status(status, message)
}

#[async_trait]
impl LedgerApi for HttpApi {
    fn set_access_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    async fn login(&self, payload: &LoginRequest) -> Result<AuthResponse> {
        self.send_json(self.request(Method::POST, "api/v1/auth/login").json(payload))
            .await
    }

    async fn refresh(&self) -> Result<AuthResponse> {
        self.send_json(self.request(Method::POST, "api/v1/auth/refresh"))
            .await
    }

    async fn register(&self, payload: &RegisterRequest, key: IdempotencyKey) -> Result<()> {
        self.send_unit(
            self.write(Method::POST, "api/v1/auth/register", key)
                .json(payload),
        )
        .await
    }

    async fn logout(&self) -> Result<()> {
        self.send_unit(self.request(Method::POST, "api/v1/auth/logout"))
            .await
    }

    async fn accounts(&self) -> Result<Vec<AccountDto>> {
        self.send_json(self.request(Method::GET, "api/v1/accounts"))
            .await
    }

    async fn transactions(&self, account_id: &str) -> Result<Vec<TransactionDto>> {
        self.send_json(self.request(Method::GET, &format!("api/v1/transactions/{account_id}")))
            .await
    }

    async fn transfer(&self, payload: &TransferByNumber, key: IdempotencyKey) -> Result<()> {
        self.send_unit(
            self.write(Method::POST, "api/v1/transfers/number", key)
                .json(payload),
        )
        .await
    }

    async fn create_account(&self, payload: &AccountNew, key: IdempotencyKey) -> Result<()> {
        self.send_unit(self.write(Method::POST, "api/v1/accounts", key).json(payload))
            .await
    }

    async fn delete_account(&self, account_id: &str, key: IdempotencyKey) -> Result<()> {
        self.send_unit(self.write(
            Method::DELETE,
            &format!("api/v1/accounts/{account_id}"),
            key,
        ))
        .await
    }

    async fn investments(&self) -> Result<Vec<InvestmentDto>> {
        self.send_json(self.request(Method::GET, "api/investments"))
            .await
    }

    async fn buy_investment(&self, payload: &InvestmentBuy, key: IdempotencyKey) -> Result<()> {
        self.send_unit(
            self.write(Method::POST, "api/investments/buy", key)
                .json(payload),
        )
        .await
    }

    async fn balance_history(&self) -> Result<Vec<BalancePointDto>> {
        self.send_json(self.request(Method::GET, "api/analytics/balance-history"))
            .await
    }

    async fn income_vs_expenses(&self) -> Result<Vec<MonthlyFlowDto>> {
        self.send_json(self.request(Method::GET, "api/analytics/income-vs-expenses"))
            .await
    }
}
