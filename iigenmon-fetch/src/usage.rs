//! Usage retrieval with cache fallback.

use chrono::Utc;
use iigenmon_core::{ErrorLog, TokenSet, UsageResponse, UsageSnapshot};
use tracing::{debug, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::host::CacheKind;

/// A snapshot and whether it came from the network.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedUsage {
    /// Parsed usage.
    pub snapshot: UsageSnapshot,
    /// True for a live fetch, false for the cached fallback.
    pub fresh: bool,
}

/// Retrieves usage, falling back to the last good cached response.
#[derive(Debug, Clone, Copy)]
pub struct UsageFetcher<'a> {
    ctx: &'a FetchContext,
}

impl<'a> UsageFetcher<'a> {
    /// Creates a usage fetcher over the given host APIs.
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    /// Fetches usage for `username`.
    ///
    /// With tokens, the toolbox is queried first. Any failure other than
    /// token expiry is recorded in `errors` and the cached response is used
    /// instead. Without tokens, only the cache is consulted.
    ///
    /// # Errors
    ///
    /// - [`FetchError::TokensExpired`] when the toolbox rejects the tokens;
    ///   the cache is not consulted so the caller can refresh and retry
    /// - [`FetchError::NoDataAvailable`] when nothing live or cached is usable
    #[instrument(skip(self, tokens, errors))]
    pub async fn fetch(
        &self,
        tokens: Option<&TokenSet>,
        username: &str,
        errors: &mut ErrorLog,
    ) -> Result<FetchedUsage, FetchError> {
        if let Some(tokens) = tokens {
            match self.fetch_live(tokens, username).await {
                Ok(snapshot) => {
                    return Ok(FetchedUsage {
                        snapshot,
                        fresh: true,
                    });
                }
                Err(FetchError::TokensExpired) => return Err(FetchError::TokensExpired),
                Err(e) => {
                    warn!(error = %e, "Live usage fetch failed");
                    errors.push(e.to_string());
                }
            }
        } else {
            debug!("No tokens, skipping live fetch");
        }

        match self.load_cached(username).await {
            Ok(Some(snapshot)) => Ok(FetchedUsage {
                snapshot,
                fresh: false,
            }),
            Ok(None) => {
                errors.push(FetchError::NoDataAvailable.to_string());
                Err(FetchError::NoDataAvailable)
            }
            Err(e) => {
                errors.push(e.to_string());
                errors.push(FetchError::NoDataAvailable.to_string());
                Err(FetchError::NoDataAvailable)
            }
        }
    }

    /// Queries the toolbox and caches the raw response on success.
    async fn fetch_live(&self, tokens: &TokenSet, username: &str) -> Result<UsageSnapshot, FetchError> {
        let body = self
            .ctx
            .toolbox
            .usage(&tokens.account_token, &tokens.service_token)
            .await?;
        let response = UsageResponse::from_json(&body)?;

        if !response.success {
            if response.is_token_expired() {
                debug!("Toolbox reports expired tokens");
                return Err(FetchError::TokensExpired);
            }
            return Err(FetchError::Remote(
                response
                    .error
                    .unwrap_or_else(|| "Usage query failed".to_string()),
            ));
        }

        let snapshot = response.to_snapshot(Utc::now())?;

        if let Err(e) = self.ctx.cache.write(username, CacheKind::Usage, &body).await {
            warn!(error = %e, "Failed to cache usage");
        }

        debug!(service_id = %tokens.service_id, "Fetched fresh usage");
        Ok(snapshot)
    }

    /// Parses the cached usage response, stamped with the file's mtime.
    ///
    /// `Ok(None)` if there is no cached response.
    #[instrument(skip(self))]
    pub async fn load_cached(&self, username: &str) -> Result<Option<UsageSnapshot>, FetchError> {
        let Some(cached) = self.ctx.cache.read(username, CacheKind::Usage).await? else {
            debug!("No cached usage");
            return Ok(None);
        };

        let snapshot = UsageResponse::from_json(&cached.contents)?.to_snapshot(cached.modified)?;
        debug!(retrieved_at = %cached.modified, "Loaded cached usage");
        Ok(Some(snapshot))
    }
}

// ============================================================================
// Tests
// ============================================================================
