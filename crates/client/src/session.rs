use std::sync::Arc;

use api_types::auth::{AuthResponse, LoginRequest, RegisterRequest};
use ledger::validation;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    api::{IdempotencyKey, LedgerApi},
    convert,
    error::Result,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl UserProfile {
    /// Name to greet the user with.
    pub fn display_name(&self) -> Option<&str> {
        self.full_name.as_deref().or(self.email.as_deref())
    }
}

/// Where the session stands, as consumed by views that require a login.
///
/// While `Initializing`, such views must render nothing (or a loader) so a
/// returning user never sees the login screen flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Authenticated,
    Unauthenticated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub access_token: Option<String>,
    /// `true` until the first [`SessionStore::check_auth`] (or login) settles.
    pub is_initializing: bool,
    pub is_loading: bool,
    pub user: Option<UserProfile>,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            access_token: None,
            is_initializing: true,
            is_loading: false,
            user: None,
            error: None,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_initializing {
            SessionPhase::Initializing
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }
}

/// Current credential and user. Kept in memory only; a restart recovers the
/// session through the refresh cookie.
#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn LedgerApi>,
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn LedgerApi>) -> Self {
        Self {
            api,
            inner: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.read().await.phase()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    fn authenticate(&self, state: &mut SessionState, auth: AuthResponse) {
        self.api.set_access_token(Some(auth.access_token.clone()));
        state.access_token = Some(auth.access_token);
        state.user = auth.user.map(convert::user);
        state.error = None;
    }

    fn clear(&self, state: &mut SessionState) {
        self.api.set_access_token(None);
        state.access_token = None;
        state.user = None;
    }

    /// Recovers a session from the refresh cookie. Must run once at start-up.
    ///
    /// A missing or expired cookie is the normal "not logged in" case and is
    /// not reported as an error.
    pub async fn check_auth(&self) {
        let result = self.api.refresh().await;
        let mut state = self.inner.write().await;
        match result {
            Ok(auth) => {
                tracing::debug!("session restored from refresh cookie");
                self.authenticate(&mut state, auth);
            }
            Err(err) => {
                tracing::debug!("no session to restore: {err}");
                self.clear(&mut state);
            }
        }
        state.is_initializing = false;
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        validation::validate_login(email, password)?;

        {
            let mut state = self.inner.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let payload = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let result = self.api.login(&payload).await;

        let mut state = self.inner.write().await;
        state.is_loading = false;
        state.is_initializing = false;
        match result {
            Ok(auth) => {
                tracing::info!(email = %payload.email, "logged in");
                self.authenticate(&mut state, auth);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(email = %payload.email, "login failed: {err}");
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Creates an account on the backend. Does not log the user in.
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<()> {
        validation::validate_registration(email, password, full_name)?;

        {
            let mut state = self.inner.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let payload = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            full_name: full_name.trim().to_string(),
        };
        let result = self.api.register(&payload, IdempotencyKey::new()).await;

        let mut state = self.inner.write().await;
        state.is_loading = false;
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(email = %payload.email, "registration failed: {err}");
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Ends the session. Local state is always cleared; telling the backend is
    /// best-effort.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!("logout request failed: {err}");
        }
        let mut state = self.inner.write().await;
        self.clear(&mut state);
        state.error = None;
        state.is_loading = false;
        state.is_initializing = false;
    }
}
