//! Password command - store a toolbox password in the system keychain.

use anyhow::{Context, Result};
use iigenmon_fetch::SystemKeychain;
use iigenmon_fetch::host::keychain::set_password;
use tracing::info;

/// Stores `password` for `username`.
pub async fn run(username: &str, password: &str) -> Result<()> {
    let keychain = SystemKeychain::new();
    set_password(&keychain, username, password)
        .await
        .with_context(|| format!("Failed to store password for {username}"))?;

    info!(username, "Stored password");
    Ok(())
}
