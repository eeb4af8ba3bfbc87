//! Fetch error types.

use iigenmon_core::CoreError;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for token acquisition and usage retrieval.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No password stored for the user.
    #[error("No password found for {0}")]
    AuthConfig(String),

    /// The toolbox rejected the username or password.
    #[error("Login failed: {0}")]
    AuthFailed(String),

    /// The requested service is not on the account.
    #[error("{0}")]
    ServiceNotFound(String),

    /// The toolbox no longer accepts the cached tokens.
    #[error("Tokens expired")]
    TokensExpired,

    /// Transport failure talking to the toolbox.
    #[error("Network error: {0}")]
    Network(#[from] HttpError),

    /// The toolbox reported an error.
    #[error("Error in response: {0}")]
    Remote(String),

    /// The toolbox answered with something we could not use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No fresh data and nothing cached.
    #[error("No cached data.")]
    NoDataAvailable,

    /// Keychain error.
    #[error("Keychain error: {0}")]
    Keychain(#[from] KeychainError),

    /// Cache file error.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl FetchError {
    /// Returns true if the run cannot produce fresh data after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthConfig(_) | Self::AuthFailed(_) | Self::ServiceNotFound(_)
        )
    }

    /// Returns true if retrying would only repeat a credential problem.
    pub fn stops_retries(&self) -> bool {
        matches!(self, Self::AuthConfig(_) | Self::AuthFailed(_))
    }
}

impl From<CoreError> for FetchError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ServiceNotFound(_) => Self::ServiceNotFound(err.to_string()),
            CoreError::InvalidData(msg) => Self::InvalidResponse(msg),
            CoreError::Serialization(e) => Self::InvalidResponse(e.to_string()),
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

// ============================================================================
// Keychain Error
// ============================================================================

/// Error type for keychain operations.
#[derive(Debug, Error)]
pub enum KeychainError {
    /// The platform credential store failed or is unavailable.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Generic error.
    #[error("Keychain error: {0}")]
    Other(String),
}

impl From<keyring::Error> for KeychainError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(e) | keyring::Error::NoStorageAccess(e) => {
                KeychainError::Platform(e.to_string())
            }
            _ => KeychainError::Other(err.to_string()),
        }
    }
}

// ============================================================================
// Cache Error
// ============================================================================

/// Error type for cache file operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(FetchError::AuthConfig("u".into()).is_fatal());
        assert!(FetchError::AuthFailed("bad".into()).stops_retries());
        assert!(FetchError::ServiceNotFound("x".into()).is_fatal());
        assert!(!FetchError::ServiceNotFound("x".into()).stops_retries());
        assert!(!FetchError::TokensExpired.is_fatal());
        assert!(!FetchError::Remote("busy".into()).is_fatal());
        assert!(!FetchError::Network(HttpError::Status(503)).is_fatal());
    }

    #[test]
    fn test_keyring_error_mapping() {
        let err: KeychainError = keyring::Error::NoEntry.into();
        assert!(matches!(err, KeychainError::Other(_)));

        let err: KeychainError = keyring::Error::TooLong("user".into(), 64).into();
        assert!(matches!(err, KeychainError::Other(_)));
    }

    #[test]
    fn test_core_error_mapping() {
        let err: FetchError = CoreError::ServiceNotFound(Some("9".into())).into();
        assert!(matches!(err, FetchError::ServiceNotFound(_)));
        assert_eq!(err.to_string(), "Service 9 not found or does not support usage");

        let err: FetchError = CoreError::InvalidData("no body".into()).into();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
