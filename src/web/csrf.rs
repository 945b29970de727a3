use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use tower_sessions::Session;
use tracing::warn;

const SESSION_KEY: &str = "_csrf_tokens";
const TOKEN_LENGTH: usize = 32;

/// Checks a submitted token against the one issued for `scope`.
#[async_trait]
pub trait CsrfValidator: Send + Sync {
    async fn is_valid(&self, scope: &str, token: &str) -> bool;
}

/// Scope protecting the delete form of post `id`.
#[must_use]
pub fn delete_scope(id: i64) -> String {
    format!("delete{id}")
}

/// Tokens kept in the visitor's session, one per scope.
#[derive(Clone)]
pub struct SessionCsrf {
    session: Session,
}

impl SessionCsrf {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn tokens(&self) -> HashMap<String, String> {
        match self
            .session
            .get::<HashMap<String, String>>(SESSION_KEY)
            .await
        {
            Ok(tokens) => tokens.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read CSRF tokens: {}", e);
                HashMap::new()
            }
        }
    }

    /// Returns the token for `scope`, creating one on first use.
    pub async fn issue(&self, scope: &str) -> String {
        let mut tokens = self.tokens().await;
        if let Some(token) = tokens.get(scope) {
            return token.clone();
        }

        let token = generate_token();
        tokens.insert(scope.to_string(), token.clone());
        if let Err(e) = self.session.insert(SESSION_KEY, tokens).await {
            warn!("Failed to store CSRF token: {}", e);
        }
        token
    }
}

#[async_trait]
impl CsrfValidator for SessionCsrf {
    async fn is_valid(&self, scope: &str, token: &str) -> bool {
        self.tokens()
            .await
            .get(scope)
            .is_some_and(|expected| constant_time_eq(expected.as_bytes(), token.as_bytes()))
    }
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
