use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::*;

use super::{
    auth::Credentials,
    error::{AuthError, FetchError},
};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const LOGIN_PATH: &str = "/api/collections/users/auth-with-password";
const RECORDS_PATH: &str = "/api/collections/systems/records";

/// The two hub calls the proxy depends on.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Logs in with a password and returns the bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError>;

    /// Returns the systems listing payload untouched.
    async fn fetch_records(&self, token: &str) -> Result<Value, FetchError>;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BeszelClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BeszelClient {
    pub fn try_new(base_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build the Beszel HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Upstream for BeszelClient {
    #[instrument(level = "debug", skip_all, fields(identity = %credentials.identity))]
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let response = self
            .http_client
            .post(self.endpoint(LOGIN_PATH))
            .json(&LoginRequest {
                identity: &credentials.identity,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        let body: LoginResponse = response.json().await.map_err(AuthError::Decode)?;
        match body.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MissingToken),
        }
    }

    #[instrument(level = "debug", skip_all)]
    async fn fetch_records(&self, token: &str) -> Result<Value, FetchError> {
        let response = self
            .http_client
            .get(self.endpoint(RECORDS_PATH))
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.json().await.map_err(FetchError::Decode)
    }
}
