//! Secure credential storage using the system keychain.
//!
//! This module provides access to the system's secure credential storage:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Passwords are keyed by the application id ([`APP_ID`]) and the toolbox
//! username.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::KeychainError;

/// Keychain service name under which passwords are stored.
pub const APP_ID: &str = "iigenmon";

// ============================================================================
// Keychain API Trait
// ============================================================================

/// API for secure credential storage.
#[async_trait]
pub trait KeychainApi: Send + Sync {
    /// Get a credential from the keychain.
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - Credential found
    /// * `Ok(None)` - Credential not found
    /// * `Err(e)` - Error accessing keychain
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError>;

    /// Set a credential in the keychain.
    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError>;
}

// ============================================================================
// System Keychain Implementation
// ============================================================================

/// Default implementation using the system keychain via the `keyring` crate.
#[derive(Debug, Clone, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    /// Creates a new system keychain instance.
    pub fn new() -> Self {
        Self
    }

    fn entry(service: &str, account: &str) -> Result<Entry, KeychainError> {
        Entry::new(service, account).map_err(|e| KeychainError::Platform(e.to_string()))
    }
}

#[async_trait]
impl KeychainApi for SystemKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        debug!(service = %service, account = %account, "Getting credential from keychain");

        let entry = Self::entry(service, account)?;

        match entry.get_password() {
            Ok(secret) if !secret.is_empty() => {
                debug!(service = %service, account = %account, "Credential found");
                Ok(Some(secret))
            }
            // Empty password or no entry both mean "not found"
            Ok(_) | Err(keyring::Error::NoEntry) => {
                debug!(service = %service, account = %account, "Credential not found");
                Ok(None)
            }
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Failed to get credential");
                Err(e.into())
            }
        }
    }

    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Setting credential in keychain");

        let entry = Self::entry(service, account)?;

        entry.set_password(secret).map_err(|e| {
            warn!(service = %service, account = %account, error = %e, "Failed to set credential");
            KeychainError::from(e)
        })?;

        debug!(service = %service, account = %account, "Credential stored successfully");
        Ok(())
    }
}

// ============================================================================
// Password helpers
// ============================================================================

/// Reads the stored toolbox password for `username`.
pub async fn get_password<K: KeychainApi + ?Sized>(
    keychain: &K,
    username: &str,
) -> Result<Option<String>, KeychainError> {
    keychain.get(APP_ID, username).await
}

/// Stores the toolbox password for `username`.
pub async fn set_password<K: KeychainApi + ?Sized>(
    keychain: &K,
    username: &str,
    password: &str,
) -> Result<(), KeychainError> {
    keychain.set(APP_ID, username, password).await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryKeychain;

    #[tokio::test]
    async fn test_password_roundtrip() {
        let keychain = MemoryKeychain::new();
        assert_eq!(get_password(&keychain, "alice").await.unwrap(), None);

        set_password(&keychain, "alice", "s3cret").await.unwrap();
        assert_eq!(
            get_password(&keychain, "alice").await.unwrap().as_deref(),
            Some("s3cret")
        );
        assert_eq!(get_password(&keychain, "bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_passwords_are_keyed_by_app_id() {
        let keychain = MemoryKeychain::new();
        keychain.set("other-app", "alice", "elsewhere").await.unwrap();

        assert_eq!(get_password(&keychain, "alice").await.unwrap(), None);
    }

    // Note: SystemKeychain needs platform access and is not exercised here.
}
