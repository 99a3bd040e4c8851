use std::sync::Arc;

use serde_json::Value;
use tracing::*;

use super::{
    auth::{Authenticator, Credentials, TokenCache},
    client::Upstream,
    error::Error,
};

/// Straight-line access to the hub: valid token first, then the systems listing.
pub struct Manager {
    upstream: Arc<dyn Upstream>,
    authenticator: Authenticator,
}

impl Manager {
    pub fn new(upstream: Arc<dyn Upstream>, credentials: Credentials) -> Self {
        Self {
            authenticator: Authenticator::new(upstream.clone(), credentials, TokenCache::default()),
            upstream,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn systems(&self) -> Result<Value, Error> {
        let token = self.authenticator.get_valid_token().await?;

        let payload = self
            .upstream
            .fetch_records(&token)
            .await
            .map_err(|error| {
                error!("Failed to fetch systems data: {error}");
                error
            })?;

        Ok(payload)
    }
}
