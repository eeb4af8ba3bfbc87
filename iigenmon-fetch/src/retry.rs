//! Retry policy for a usage run.
//!
//! The controller is a small state machine:
//!
//! ```text
//! Start -> TokensAcquired -> UsageAttempted -> Done
//!                 ^                |  |
//!                 |                |  +-> Backoff -> (Start | TokensAcquired)
//!                 +-- RefreshTokens <-+
//!                          |
//!                          +-> GiveUp -> Done
//! ```
//!
//! A token refresh never waits; a failed usage attempt waits for the
//! backoff before the next attempt.

use std::time::Duration;

use iigenmon_core::{ReportState, TokenSet};
use tracing::{debug, info, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::session::TokenManager;
use crate::usage::UsageFetcher;

/// Default number of usage attempts per run.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between failed usage attempts.
pub const DEFAULT_BACKOFF_SECS: u64 = 60;

// ============================================================================
// Policy
// ============================================================================

/// How many times to attempt a usage fetch and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total usage attempts, including the first.
    pub max_attempts: u32,
    /// Pause after a failed attempt. Not applied after a token refresh.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A policy that never pauses.
    pub fn without_backoff(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::from_secs(DEFAULT_BACKOFF_SECS))
    }
}

// ============================================================================
// State Machine
// ============================================================================

/// Result of one usage attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Fresh or cached data is available.
    Succeeded,
    /// The toolbox rejected the tokens.
    TokensExpired,
    /// Nothing usable, live or cached.
    Failed,
}

/// Controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Nothing done yet (or a full cycle is restarting without tokens).
    Start,
    /// Token acquisition finished, successfully or not.
    TokensAcquired,
    /// A usage attempt finished.
    UsageAttempted(Attempt),
    /// Cached tokens must be dropped and re-acquired.
    RefreshTokens,
    /// Waiting before the next full attempt.
    Backoff,
    /// No more attempts will be made.
    GiveUp,
    /// Finished.
    Done,
}

/// What a run produced, with counters for the retry behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryOutcome {
    /// State for the renderer.
    pub report: ReportState,
    /// Usage attempts made.
    pub attempts: u32,
    /// Token refreshes after expiry.
    pub refreshes: u32,
    /// Backoff pauses taken.
    pub pauses: u32,
}

/// Drives token acquisition and usage fetching for one run.
#[derive(Debug, Clone)]
pub struct RetryController<'a> {
    ctx: &'a FetchContext,
    policy: RetryPolicy,
}

impl<'a> RetryController<'a> {
    /// Creates a controller.
    pub fn new(ctx: &'a FetchContext, policy: RetryPolicy) -> Self {
        Self { ctx, policy }
    }

    /// Runs the full workflow for `username`.
    ///
    /// Never fails: errors end up in the report next to whatever data could
    /// be shown.
    pub async fn run(&self, username: &str, service_filter: Option<&str>) -> RetryOutcome {
        let tokens_mgr = TokenManager::new(self.ctx);
        let fetcher = UsageFetcher::new(self.ctx);

        let mut outcome = RetryOutcome::default();
        let mut tokens: Option<TokenSet> = None;
        let mut remaining = self.policy.max_attempts;
        let mut state = RetryState::Start;

        while state != RetryState::Done {
            debug!(?state, remaining, "Retry state");

            state = match state {
                RetryState::Start => match tokens_mgr.acquire(username, service_filter).await {
                    Ok(acquired) => {
                        tokens = Some(acquired);
                        RetryState::TokensAcquired
                    }
                    Err(e) => Self::acquisition_failed(&e, &mut outcome),
                },

                RetryState::TokensAcquired => {
                    outcome.attempts += 1;
                    remaining -= 1;

                    let attempt = match fetcher
                        .fetch(tokens.as_ref(), username, &mut outcome.report.errors)
                        .await
                    {
                        Ok(fetched) => {
                            outcome.report.fresh = fetched.fresh;
                            outcome.report.snapshot = Some(fetched.snapshot);
                            Attempt::Succeeded
                        }
                        Err(FetchError::TokensExpired) => Attempt::TokensExpired,
                        Err(_) => Attempt::Failed,
                    };
                    RetryState::UsageAttempted(attempt)
                }

                RetryState::UsageAttempted(Attempt::Succeeded) => RetryState::Done,

                RetryState::UsageAttempted(Attempt::TokensExpired) => {
                    info!("Tokens expired, refreshing");
                    RetryState::RefreshTokens
                }

                RetryState::UsageAttempted(Attempt::Failed) if remaining > 0 => {
                    RetryState::Backoff
                }

                RetryState::UsageAttempted(Attempt::Failed) => {
                    warn!(attempts = outcome.attempts, "Giving up on usage");
                    RetryState::Done
                }

                RetryState::RefreshTokens => {
                    outcome.refreshes += 1;
                    tokens = None;
                    if let Err(e) = tokens_mgr.invalidate(username).await {
                        warn!(error = %e, "Failed to drop cached tokens");
                    }

                    if remaining == 0 {
                        warn!(attempts = outcome.attempts, "Tokens still expired, giving up");
                        RetryState::GiveUp
                    } else {
                        match tokens_mgr.acquire(username, service_filter).await {
                            Ok(acquired) => {
                                tokens = Some(acquired);
                                RetryState::TokensAcquired
                            }
                            Err(e) => Self::acquisition_failed(&e, &mut outcome),
                        }
                    }
                }

                RetryState::Backoff => {
                    outcome.pauses += 1;
                    info!(secs = self.policy.backoff.as_secs(), "Backing off before retry");
                    tokio::time::sleep(self.policy.backoff).await;
                    if tokens.is_some() {
                        RetryState::TokensAcquired
                    } else {
                        RetryState::Start
                    }
                }

                RetryState::GiveUp => {
                    if outcome.report.snapshot.is_none() {
                        Self::fall_back_to_cache(&fetcher, username, &mut outcome).await;
                    }
                    RetryState::Done
                }

                RetryState::Done => RetryState::Done,
            };
        }

        info!(
            attempts = outcome.attempts,
            refreshes = outcome.refreshes,
            pauses = outcome.pauses,
            fresh = outcome.report.fresh,
            "Usage run finished"
        );
        outcome
    }

    /// Records a failed acquisition and picks the next state.
    ///
    /// Credential and service problems give up; transient failures carry on
    /// without tokens so the cache can still be used.
    fn acquisition_failed(err: &FetchError, outcome: &mut RetryOutcome) -> RetryState {
        outcome.report.errors.push(err.to_string());
        if err.is_fatal() {
            warn!(error = %err, "Token acquisition failed, not retrying");
            RetryState::GiveUp
        } else {
            warn!(error = %err, "Token acquisition failed");
            RetryState::TokensAcquired
        }
    }

    async fn fall_back_to_cache(
        fetcher: &UsageFetcher<'_>,
        username: &str,
        outcome: &mut RetryOutcome,
    ) {
        match fetcher.load_cached(username).await {
            Ok(Some(snapshot)) => {
                outcome.report.snapshot = Some(snapshot);
                outcome.report.fresh = false;
            }
            Ok(None) => outcome
                .report
                .errors
                .push(FetchError::NoDataAvailable.to_string()),
            Err(e) => {
                outcome.report.errors.push(e.to_string());
                outcome
                    .report
                    .errors
                    .push(FetchError::NoDataAvailable.to_string());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
