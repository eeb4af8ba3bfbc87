//! Session and token management.
//!
//! Tokens come from the cached login response when there is one, otherwise
//! from a fresh login with the password from the keychain. The whole login
//! response is cached, and the service is selected from it on every read.

use iigenmon_core::{CoreError, Credentials, LoginResponse, TokenSet};
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::host::CacheKind;
use crate::host::keychain::get_password;

/// Obtains and persists account and service tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenManager<'a> {
    ctx: &'a FetchContext,
}

impl<'a> TokenManager<'a> {
    /// Creates a token manager over the given host APIs.
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    /// Returns tokens for `username`, from cache or by logging in.
    ///
    /// # Errors
    ///
    /// - [`FetchError::AuthConfig`] if no password is stored
    /// - [`FetchError::AuthFailed`] if the toolbox rejects the credentials
    /// - [`FetchError::ServiceNotFound`] if no usage-capable service matches
    /// - [`FetchError::Network`] / [`FetchError::Remote`] for transient failures
    #[instrument(skip(self))]
    pub async fn acquire(
        &self,
        username: &str,
        service_filter: Option<&str>,
    ) -> Result<TokenSet, FetchError> {
        if let Some(login) = self.cached_login(username).await {
            match login.select_service(service_filter) {
                Ok(tokens) => {
                    debug!("Using cached tokens");
                    return Ok(tokens);
                }
                Err(CoreError::InvalidData(reason)) => {
                    warn!(%reason, "Cached login has no usable tokens");
                    self.discard_cached_login(username).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let credentials = match get_password(self.ctx.keychain.as_ref(), username).await {
            Ok(Some(password)) => Credentials::new(username, password),
            Ok(None) => return Err(FetchError::AuthConfig(username.to_string())),
            Err(e) => {
                warn!(error = %e, "Keychain read failed");
                return Err(FetchError::AuthConfig(username.to_string()));
            }
        };

        let body = self
            .ctx
            .toolbox
            .login(&credentials.username, &credentials.password)
            .await?;
        let login = LoginResponse::from_json(&body)?;

        if login.success {
            info!("Logged in");
            let selected = login.select_service(service_filter);
            if matches!(selected, Err(CoreError::InvalidData(_))) {
                warn!("Login response has no usable tokens, not caching it");
            } else if let Err(e) = self.ctx.cache.write(username, CacheKind::Tokens, &body).await {
                warn!(error = %e, "Failed to cache tokens");
            }
            return Ok(selected?);
        }

        let message = login
            .error
            .clone()
            .unwrap_or_else(|| "Login failed".to_string());

        if login.is_invalid_credentials() {
            warn!("Toolbox rejected credentials");
            Err(FetchError::AuthFailed(message))
        } else {
            Err(FetchError::Remote(message))
        }
    }

    /// Deletes the cached login so the next [`acquire`](Self::acquire) logs in.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, username: &str) -> Result<(), FetchError> {
        debug!("Removing cached tokens");
        self.ctx.cache.remove(username, CacheKind::Tokens).await?;
        Ok(())
    }

    /// Loads the cached login response, discarding it if it is unusable.
    async fn cached_login(&self, username: &str) -> Option<LoginResponse> {
        let cached = match self.ctx.cache.read(username, CacheKind::Tokens).await {
            Ok(cached) => cached?,
            Err(e) => {
                warn!(error = %e, "Failed to read token cache");
                return None;
            }
        };

        match LoginResponse::from_json(&cached.contents) {
            Ok(login) if login.success => Some(login),
            Ok(_) | Err(_) => {
                warn!("Discarding unusable token cache");
                self.discard_cached_login(username).await;
                None
            }
        }
    }

    async fn discard_cached_login(&self, username: &str) {
        if let Err(e) = self.ctx.cache.remove(username, CacheKind::Tokens).await {
            warn!(error = %e, "Failed to remove token cache");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
