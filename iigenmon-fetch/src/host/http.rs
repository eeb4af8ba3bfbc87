//! Toolbox HTTP transport.
//!
//! The toolbox API is a single CGI endpoint driven by query parameters:
//! - login: `?_USERNAME=<user>&_PASSWORD=<password>`
//! - usage: `?Usage&_TOKEN=<account token>&_SERVICE=<service token>`
//!
//! Responses are returned as raw text so callers can cache them verbatim.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default toolbox endpoint.
pub const DEFAULT_API_BASE: &str = "https://toolbox.iinet.net.au/cgi-bin/api.cgi";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for iigenmon.
const USER_AGENT: &str = concat!("iigenmon/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Toolbox API Trait
// ============================================================================

/// Request/response access to the toolbox.
#[async_trait]
pub trait ToolboxApi: Send + Sync {
    /// Logs in and returns the raw response body.
    async fn login(&self, username: &str, password: &str) -> Result<String, HttpError>;

    /// Queries usage and returns the raw response body.
    async fn usage(&self, account_token: &str, service_token: &str) -> Result<String, HttpError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// `reqwest`-backed toolbox client.
#[derive(Debug, Clone)]
pub struct ToolboxClient {
    inner: Client,
    base: Url,
}

impl ToolboxClient {
    /// Creates a client for the default endpoint.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_base(DEFAULT_API_BASE, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client for a custom endpoint and timeout.
    pub fn with_base(base: &str, timeout: Duration) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner, base })
    }

    fn login_url(&self, username: &str, password: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("_USERNAME", username)
            .append_pair("_PASSWORD", password);
        url
    }

    fn usage_url(&self, account_token: &str, service_token: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_key_only("Usage")
            .append_pair("_TOKEN", account_token)
            .append_pair("_SERVICE", service_token);
        url
    }

    async fn get_text(&self, url: Url) -> Result<String, HttpError> {
        let response = self
            .inner
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Response received");
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ToolboxApi for ToolboxClient {
    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<String, HttpError> {
        debug!("Logging in");
        self.get_text(self.login_url(username, password)).await
    }

    #[instrument(skip_all)]
    async fn usage(&self, account_token: &str, service_token: &str) -> Result<String, HttpError> {
        debug!("Querying usage");
        self.get_text(self.usage_url(account_token, service_token))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
