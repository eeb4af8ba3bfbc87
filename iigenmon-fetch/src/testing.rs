//! In-memory host fakes for workflow tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::context::FetchContext;
use crate::error::{CacheError, HttpError, KeychainError};
use crate::host::{CacheApi, CacheKind, CachedFile, KeychainApi, ToolboxApi};

// ============================================================================
// Keychain
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryKeychain {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryKeychain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password(username: &str, password: &str) -> Self {
        let keychain = Self::new();
        keychain.entries.lock().unwrap().insert(
            (crate::host::keychain::APP_ID.to_string(), username.to_string()),
            password.to_string(),
        );
        keychain
    }
}

#[async_trait]
impl KeychainApi for MemoryKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError> {
        self.entries
            .lock()
            .unwrap()
            .insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCache {
    files: Mutex<HashMap<(String, CacheKind), CachedFile>>,
    removals: Mutex<Vec<(String, CacheKind)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, username: &str, kind: CacheKind, contents: &str, modified: DateTime<Utc>) {
        self.files.lock().unwrap().insert(
            (username.to_string(), kind),
            CachedFile {
                contents: contents.to_string(),
                modified,
            },
        );
    }

    pub fn get(&self, username: &str, kind: CacheKind) -> Option<CachedFile> {
        self.files
            .lock()
            .unwrap()
            .get(&(username.to_string(), kind))
            .cloned()
    }

    pub fn removals(&self, kind: CacheKind) -> usize {
        self.removals
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, k)| *k == kind)
            .count()
    }
}

#[async_trait]
impl CacheApi for MemoryCache {
    async fn read(&self, username: &str, kind: CacheKind) -> Result<Option<CachedFile>, CacheError> {
        Ok(self.get(username, kind))
    }

    async fn write(&self, username: &str, kind: CacheKind, contents: &str) -> Result<(), CacheError> {
        self.insert(username, kind, contents, Utc::now());
        Ok(())
    }

    async fn remove(&self, username: &str, kind: CacheKind) -> Result<(), CacheError> {
        self.removals
            .lock()
            .unwrap()
            .push((username.to_string(), kind));
        self.files
            .lock()
            .unwrap()
            .remove(&(username.to_string(), kind));
        Ok(())
    }
}

// ============================================================================
// Toolbox
// ============================================================================

/// Toolbox fake answering from queued responses. An empty queue answers with
/// HTTP 503, standing in for "no network".
#[derive(Debug, Default)]
pub struct ScriptedToolbox {
    logins: Mutex<VecDeque<Result<String, HttpError>>>,
    usages: Mutex<VecDeque<Result<String, HttpError>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedToolbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, body: &str) {
        self.logins.lock().unwrap().push_back(Ok(body.to_string()));
    }

    pub fn push_usage(&self, body: &str) {
        self.usages.lock().unwrap().push_back(Ok(body.to_string()));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }
}

#[async_trait]
impl ToolboxApi for ScriptedToolbox {
    async fn login(&self, _username: &str, _password: &str) -> Result<String, HttpError> {
        self.calls.lock().unwrap().push("login");
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HttpError::Status(503)))
    }

    async fn usage(&self, _account_token: &str, _service_token: &str) -> Result<String, HttpError> {
        self.calls.lock().unwrap().push("usage");
        self.usages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HttpError::Status(503)))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const LOGIN_OK: &str = r#"{"success": 1, "token": "acct-1", "response": {"service_list": [
    {"pk_v": "777", "actions": ["Usage"], "s_token": "svc-1"}
]}}"#;

pub const LOGIN_OK_2: &str = r#"{"success": 1, "token": "acct-2", "response": {"service_list": [
    {"pk_v": "777", "actions": ["Usage"], "s_token": "svc-2"}
]}}"#;

pub const LOGIN_NO_TOKEN: &str = r#"{"success": 1, "response": {"service_list": [
    {"pk_v": "777", "actions": ["Usage"]}
]}}"#;

pub const LOGIN_BAD_PASSWORD: &str = r#"{"success": 0, "error": "Invalid username or password"}"#;

pub const USAGE_OK: &str = r#"{"success": 1, "response": {
    "quota_reset": {"days_so_far": 10, "days_remaining": 20},
    "usage": {"traffic_types": [
        {"classification": "anytime", "used": 500000000000, "allocation": 1000000000000, "is_shaped": 0}
    ]}}}"#;

pub const USAGE_EXPIRED: &str =
    r#"{"success": 0, "error": "Authentication required or token has expired"}"#;

pub const USAGE_BUSY: &str = r#"{"success": 0, "error": "Service temporarily unavailable"}"#;

/// Fakes plus a context wired to them.
pub struct Harness {
    pub keychain: Arc<MemoryKeychain>,
    pub cache: Arc<MemoryCache>,
    pub toolbox: Arc<ScriptedToolbox>,
    pub ctx: FetchContext,
}

impl Harness {
    /// Harness with a stored password for `alice`.
    pub fn new() -> Self {
        Self::with_keychain(MemoryKeychain::with_password("alice", "pw"))
    }

    pub fn with_keychain(keychain: MemoryKeychain) -> Self {
        let keychain = Arc::new(keychain);
        let cache = Arc::new(MemoryCache::new());
        let toolbox = Arc::new(ScriptedToolbox::new());
        let ctx = FetchContext::new(keychain.clone(), cache.clone(), toolbox.clone());
        Self {
            keychain,
            cache,
            toolbox,
            ctx,
        }
    }
}
