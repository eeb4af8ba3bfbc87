//! Toolbox API response types and parsing.
//!
//! Both endpoints answer with the same envelope:
//! `{"success": 0|1, "response": {...}, "error": "..."}`. The raw body is
//! what gets cached on disk, so everything here parses from `&str`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::models::{TokenSet, UsageSnapshot};

/// Error text the toolbox returns for a bad username or password.
pub const INVALID_CREDENTIALS_ERROR: &str = "Invalid username or password";

/// Error text the toolbox returns when tokens are no longer accepted.
pub const TOKEN_EXPIRED_ERROR: &str = "Authentication required or token has expired";

/// Service action required for usage queries.
pub const USAGE_ACTION: &str = "Usage";

// ============================================================================
// Login Response
// ============================================================================

/// Response from the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Whether the login succeeded.
    #[serde(default, deserialize_with = "de_flag")]
    pub success: bool,
    /// Account token.
    #[serde(default)]
    pub token: Option<String>,
    /// Services on the account.
    #[serde(default)]
    pub response: Option<LoginBody>,
    /// Server-reported error.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a successful login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginBody {
    /// Services billed under the account.
    #[serde(default)]
    pub service_list: Vec<ServiceEntry>,
}

/// One service under the account.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    /// Service identifier.
    #[serde(deserialize_with = "de_string")]
    pub pk_v: String,
    /// Actions the service supports (e.g. "Usage").
    #[serde(default)]
    pub actions: Vec<String>,
    /// Service token.
    #[serde(default)]
    pub s_token: Option<String>,
}

impl ServiceEntry {
    /// Returns true if usage can be queried for this service.
    pub fn supports_usage(&self) -> bool {
        self.actions.iter().any(|a| a == USAGE_ACTION)
    }
}

impl LoginResponse {
    /// Parses a raw login response.
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        debug!(len = body.len(), "Parsing login response");
        Ok(serde_json::from_str(body)?)
    }

    /// Returns true if the server rejected the username or password.
    pub fn is_invalid_credentials(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|e| e.contains(INVALID_CREDENTIALS_ERROR))
    }

    /// Picks the token set for the requested service.
    ///
    /// Without a filter this is the first service supporting usage; with one,
    /// the usage-capable service whose id matches exactly.
    pub fn select_service(&self, filter: Option<&str>) -> Result<TokenSet, CoreError> {
        let account_token = self
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::InvalidData("login response has no token".into()))?;

        let services = self
            .response
            .as_ref()
            .map(|r| r.service_list.as_slice())
            .unwrap_or_default();

        let service = services
            .iter()
            .filter(|s| s.supports_usage())
            .find(|s| filter.is_none_or(|id| s.pk_v == id))
            .ok_or_else(|| CoreError::ServiceNotFound(filter.map(str::to_string)))?;

        let service_token = service.s_token.clone().ok_or_else(|| {
            CoreError::InvalidData(format!("service {} has no token", service.pk_v))
        })?;

        debug!(service_id = %service.pk_v, "Selected service");
        Ok(TokenSet {
            account_token,
            service_id: service.pk_v.clone(),
            service_token,
        })
    }
}

// ============================================================================
// Usage Response
// ============================================================================

/// Response from the usage endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageResponse {
    /// Whether the query succeeded.
    #[serde(default, deserialize_with = "de_flag")]
    pub success: bool,
    /// Usage body.
    #[serde(default)]
    pub response: Option<UsageBody>,
    /// Server-reported error.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a successful usage query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageBody {
    /// Quota period position.
    #[serde(default)]
    pub quota_reset: QuotaReset,
    /// Traffic breakdown.
    #[serde(default)]
    pub usage: TrafficUsage,
}

/// Where the account sits in its quota period.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotaReset {
    /// Days elapsed.
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub days_so_far: Option<u64>,
    /// Days left.
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub days_remaining: Option<u64>,
}

/// Traffic broken down by classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficUsage {
    /// Per-classification entries.
    #[serde(default)]
    pub traffic_types: Vec<TrafficType>,
}

/// One traffic classification ("anytime", "uploads", "freezone").
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficType {
    /// Classification name.
    pub classification: String,
    /// Bytes used.
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub used: Option<u64>,
    /// Quota in bytes.
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub allocation: Option<u64>,
    /// Whether shaping is in effect.
    #[serde(default, deserialize_with = "de_flag")]
    pub is_shaped: bool,
    /// Shaped speed.
    #[serde(default)]
    pub shaping_speed: Option<String>,
}

impl UsageResponse {
    /// Parses a raw usage response.
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        debug!(len = body.len(), "Parsing usage response");
        Ok(serde_json::from_str(body)?)
    }

    /// Returns true if the server says the tokens are no longer valid.
    pub fn is_token_expired(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|e| e.contains(TOKEN_EXPIRED_ERROR))
    }

    fn classification(&self, name: &str) -> Option<&TrafficType> {
        self.response
            .as_ref()?
            .usage
            .traffic_types
            .iter()
            .find(|t| t.classification == name)
    }

    /// Converts a successful response into a snapshot.
    ///
    /// The "anytime" classification and its `used` value are required;
    /// "uploads" and "freezone" are left unset when absent.
    pub fn to_snapshot(&self, retrieved_at: DateTime<Utc>) -> Result<UsageSnapshot, CoreError> {
        let body = self
            .response
            .as_ref()
            .ok_or_else(|| CoreError::InvalidData("usage response has no body".into()))?;

        let anytime = self
            .classification("anytime")
            .ok_or_else(|| CoreError::InvalidData("no anytime usage in response".into()))?;
        let anytime_used = anytime
            .used
            .ok_or_else(|| CoreError::InvalidData("anytime usage has no used value".into()))?;

        Ok(UsageSnapshot {
            days_so_far: clamp_days(body.quota_reset.days_so_far),
            days_remaining: clamp_days(body.quota_reset.days_remaining),
            anytime_used,
            anytime_allocation: anytime.allocation.unwrap_or_default(),
            anytime_is_shaped: anytime.is_shaped,
            anytime_shaping_speed: anytime.shaping_speed.clone(),
            uploads_used: self.classification("uploads").and_then(|t| t.used),
            freezone_used: self.classification("freezone").and_then(|t| t.used),
            retrieved_at,
        })
    }
}

fn clamp_days(days: Option<u64>) -> u32 {
    days.map_or(0, |d| u32::try_from(d).unwrap_or(u32::MAX))
}

// ============================================================================
// Lenient field decoding
// ============================================================================

// The toolbox is loose about JSON types: flags arrive as 0/1, true/false or
// "1", and counters sometimes as strings.

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "yes"),
        _ => false,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn de_opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid counter: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid counter: {s}"))),
        other => Err(D::Error::custom(format!("invalid counter: {other}"))),
    }
}

fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid identifier: {other}"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
