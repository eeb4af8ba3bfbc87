//! Account credentials and session tokens.

use std::fmt;

/// Username and password for a toolbox account.
///
/// The password lives in the secret store; this type only exists for the
/// duration of a login call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tokens needed to query usage for one service.
///
/// Both tokens always come from the same login response (fresh or cached);
/// there is no way to build a `TokenSet` from two different logins.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    /// Account-level session token.
    pub account_token: String,
    /// Identifier (`pk_v`) of the selected service.
    pub service_id: String,
    /// Token scoped to the selected service.
    pub service_token: String,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("service_id", &self.service_id)
            .finish_non_exhaustive()
    }
}
