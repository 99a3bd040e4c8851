use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::*;

use super::{client::Upstream, error::AuthError};

/// Tokens are kept well below the hub's own lifetime so an expired one is never served.
pub const TOKEN_LIFETIME: Duration = Duration::hours(6);

#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && now < self.expires_at
    }
}

/// A single token slot. Readers and writers never hold the lock across a hub call.
#[derive(Debug)]
pub struct TokenCache {
    lifetime: Duration,
    slot: Mutex<Option<CachedToken>>,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::with_lifetime(TOKEN_LIFETIME)
    }
}

impl TokenCache {
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            lifetime,
            slot: Mutex::new(None),
        }
    }

    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.value.clone())
    }

    pub fn store(&self, value: String, now: DateTime<Utc>) -> CachedToken {
        let token = CachedToken {
            value,
            expires_at: now + self.lifetime,
        };
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        token
    }

    pub fn current(&self) -> Option<CachedToken> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct Authenticator {
    upstream: Arc<dyn Upstream>,
    credentials: Credentials,
    cache: TokenCache,
}

impl Authenticator {
    pub fn new(upstream: Arc<dyn Upstream>, credentials: Credentials, cache: TokenCache) -> Self {
        Self {
            upstream,
            credentials,
            cache,
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        self.get_valid_token_at(Utc::now()).await
    }

    /// Returns the cached token while `now` is before its expiry, logs in again otherwise.
    /// A failed login leaves whatever is cached untouched.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_valid_token_at(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        if let Some(token) = self.cache.valid_token(now) {
            debug!("Using cached token");
            return Ok(token);
        }

        info!("Requesting a new authentication token");
        let token = self.upstream.login(&self.credentials).await.map_err(|error| {
            error!("Failed to obtain authentication token: {error}");
            error
        })?;

        let cached = self.cache.store(token, now);
        info!("New token obtained, valid until {}", cached.expires_at);

        Ok(cached.value)
    }
}
