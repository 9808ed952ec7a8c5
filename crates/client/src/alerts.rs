use std::{fmt, sync::Arc, time::Duration};

use serde::{Serialize, Serializer};
use tokio::sync::RwLock;
use uuid::Uuid;

/// How long toasts created through the helpers stay on screen.
pub const DEFAULT_AUTO_CLOSE: Duration = Duration::from_millis(5000);

/// Time-ordered identifier of an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlertId(Uuid);

impl AlertId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for AlertId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: AlertId,
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    /// Resolved expiry; `None` keeps the alert until it is dismissed.
    pub auto_close: Option<Duration>,
}

/// Toast queue. Display order is insertion order.
#[derive(Clone, Default)]
pub struct AlertStore {
    inner: Arc<RwLock<Vec<Alert>>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn alerts(&self) -> Vec<Alert> {
        self.inner.read().await.clone()
    }

    /// Queues an alert and schedules its removal.
    ///
    /// An omitted `auto_close` means [`DEFAULT_AUTO_CLOSE`]; a zero duration
    /// keeps the alert until it is dismissed.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn add_alert(
        &self,
        level: AlertLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        auto_close: Option<Duration>,
    ) -> AlertId {
        let id = AlertId::new();
        let auto_close =
            Some(auto_close.unwrap_or(DEFAULT_AUTO_CLOSE)).filter(|duration| !duration.is_zero());
        self.inner.write().await.push(Alert {
            id,
            level,
            title: title.into(),
            message: message.into(),
            auto_close,
        });

        if let Some(duration) = auto_close {
            let store = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                store.remove_alert(id).await;
            });
        }

        id
    }

    pub async fn success(&self, title: impl Into<String>, message: impl Into<String>) -> AlertId {
        self.add_alert(AlertLevel::Success, title, message, None).await
    }

    pub async fn error(&self, title: impl Into<String>, message: impl Into<String>) -> AlertId {
        self.add_alert(AlertLevel::Error, title, message, None).await
    }

    pub async fn info(&self, title: impl Into<String>, message: impl Into<String>) -> AlertId {
        self.add_alert(AlertLevel::Info, title, message, None).await
    }

    pub async fn warning(&self, title: impl Into<String>, message: impl Into<String>) -> AlertId {
        self.add_alert(AlertLevel::Warning, title, message, None).await
    }

    /// Removing an unknown id is a no-op.
    pub async fn remove_alert(&self, id: AlertId) {
        self.inner.write().await.retain(|alert| alert.id != id);
    }

    pub async fn clear_alerts(&self) {
        self.inner.write().await.clear();
    }
}
