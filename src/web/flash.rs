use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

const SESSION_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Messages produced while handling one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flashes(Vec<Flash>);

impl Flashes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.0.push(Flash {
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(FlashLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.add(FlashLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(FlashLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(FlashLevel::Error, message);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn count(&self, level: FlashLevel) -> usize {
        self.0.iter().filter(|f| f.level == level).count()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Flash> {
        self.0
    }
}

/// Keeps `flashes` in the session for the next rendered page.
pub async fn stash(session: &Session, flashes: Flashes) {
    if flashes.is_empty() {
        return;
    }

    let mut pending = match session.get::<Vec<Flash>>(SESSION_KEY).await {
        Ok(existing) => existing.unwrap_or_default(),
        Err(e) => {
            warn!("Failed to read pending flash messages: {}", e);
            Vec::new()
        }
    };
    pending.extend(flashes.into_vec());

    if let Err(e) = session.insert(SESSION_KEY, pending).await {
        warn!("Failed to store flash messages: {}", e);
    }
}

/// Drains the pending session messages followed by the ones of this request.
pub async fn take(session: &Session, current: Flashes) -> Vec<Flash> {
    let mut messages = match session.remove::<Vec<Flash>>(SESSION_KEY).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            warn!("Failed to read pending flash messages: {}", e);
            Vec::new()
        }
    };
    messages.extend(current.into_vec());
    messages
}
