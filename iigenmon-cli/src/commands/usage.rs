//! Usage command - fetch and display the account's usage report.

use std::sync::Arc;

use chrono::Local;
use iigenmon_core::{ErrorLog, ReportState};
use iigenmon_fetch::{FetchContext, RetryController, SystemKeychain, ToolboxClient};
use iigenmon_store::{Config, DiskCache};
use tracing::{debug, error, info};

use crate::output::TextFormatter;

/// Arguments for the usage command.
#[derive(Debug, Default)]
pub struct UsageArgs {
    /// Toolbox account username.
    pub username: String,
    /// Service to report on. The first usage-capable service if unset.
    pub service_id: Option<String>,
}

/// Runs the usage command and prints the report to stdout.
pub async fn run(args: &UsageArgs) {
    let report = build_report(args).await;
    let now = Local::now();
    println!("{}", TextFormatter::new(now).format_report(&report));
}

async fn build_report(args: &UsageArgs) -> ReportState {
    let config = Config::load();
    debug!(?config, "Loaded configuration");

    let toolbox = match ToolboxClient::with_base(&config.api_base, config.timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build toolbox client");
            let mut errors = ErrorLog::new();
            errors.push(e.to_string());
            return ReportState {
                snapshot: None,
                fresh: false,
                errors,
            };
        }
    };

    let ctx = FetchContext::new(
        Arc::new(SystemKeychain::new()),
        Arc::new(DiskCache::new(config.cache_dir())),
        Arc::new(toolbox),
    );

    info!(username = %args.username, service = ?args.service_id, "Fetching usage");

    let outcome = RetryController::new(&ctx, config.retry_policy())
        .run(&args.username, args.service_id.as_deref())
        .await;

    debug!(
        attempts = outcome.attempts,
        refreshes = outcome.refreshes,
        pauses = outcome.pauses,
        fresh = outcome.report.fresh,
        "Retry loop finished"
    );

    outcome.report
}
