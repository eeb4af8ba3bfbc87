// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! iigenmon - iiNet usage for a genmon status-bar panel.
//!
//! # Examples
//!
//! ```bash
//! # Store the toolbox password in the system keychain
//! iigenmon -p alice hunter2
//!
//! # Report usage for the first usage-capable service
//! iigenmon alice
//!
//! # Report usage for a specific service
//! iigenmon alice 1234567
//! ```

mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{password, usage};

// ============================================================================
// CLI Definition
// ============================================================================

/// iiNet usage for a genmon status-bar panel.
#[derive(Parser, Debug)]
#[command(name = "iigenmon")]
#[command(about = "Reports iiNet toolbox usage in genmon format")]
#[command(long_about = r#"
iigenmon logs in to the iiNet toolbox, fetches the account's usage and
prints it as a genmon panel block. Responses are cached so the last known
usage is still shown when the toolbox is unreachable.

Examples:
  iigenmon -p alice hunter2      # Store the password for alice
  iigenmon alice                 # First usage-capable service
  iigenmon alice 1234567         # A specific service
"#)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Store a password in the system keychain and exit.
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["USERNAME", "PASSWORD"],
        conflicts_with_all = ["username", "service_id"]
    )]
    pub password: Option<Vec<String>>,

    /// Toolbox username.
    #[arg(required_unless_present = "password")]
    pub username: Option<String>,

    /// Service to report on.
    pub service_id: Option<String>,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iigenmon=warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    setup_logging();

    match (cli.password.as_deref(), cli.username) {
        (Some([username, secret]), _) => {
            if let Err(e) = password::run(username, secret).await {
                eprintln!("Error: {e:#}");
            }
        }
        (_, Some(username)) => {
            let args = usage::UsageArgs {
                username,
                service_id: cli.service_id,
            };
            usage::run(&args).await;
        }
        // clap guarantees one of the two forms
        _ => {}
    }
}
