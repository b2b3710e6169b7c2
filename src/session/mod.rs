pub mod jwt;

use crate::error::SessionError;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name the browser client stores the bearer token under.
pub const AUTH_COOKIE_KEY: &str = "authToken";

pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token"];

/// Pulls the bearer token out of a login/signup response, looking through
/// nested `data` objects.
pub fn extract_token(body: &Value) -> Option<String> {
    let object = body.as_object()?;

    let direct = TOKEN_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|token| !token.is_empty());
    if let Some(token) = direct {
        return Some(token.to_string());
    }

    match object.get("data") {
        Some(data @ Value::Object(_)) => extract_token(data),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredToken {
    #[serde(rename = "authToken")]
    token: String,
    expires_at: DateTime<Utc>,
}

/// File-backed token store. Entries age out after `max_age` like the
/// browser cookie does, independent of the token's own `exp`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    max_age: Duration,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, token: &str, now: DateTime<Utc>) -> Result<(), SessionError> {
        let entry = StoredToken {
            token: token.to_string(),
            expires_at: now + self.max_age,
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&entry)?)?;
        info!("Stored session token in {}", self.path.display());
        Ok(())
    }

    pub fn load(&self, now: DateTime<Utc>) -> Result<Option<String>, SessionError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: StoredToken = serde_json::from_slice(&raw)?;
        if entry.expires_at <= now {
            debug!("Stored token passed its max age at {}", entry.expires_at);
            return Ok(None);
        }
        Ok(Some(entry.token))
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The stored token, provided it still looks usable. This is only a
    /// convenience check; the backend remains the authority.
    pub fn require_fresh(&self, now: DateTime<Utc>) -> Result<String, SessionError> {
        let token = self.load(now)?.ok_or(SessionError::NotLoggedIn)?;
        if !jwt::is_token_fresh(&token, now) {
            warn!("Stored token is expired or unreadable");
            return Err(SessionError::Expired);
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_token_under_any_known_key() {
        assert_eq!(extract_token(&json!({"token": "a"})).as_deref(), Some("a"));
        assert_eq!(extract_token(&json!({"access_token": "b"})).as_deref(), Some("b"));
        assert_eq!(
            extract_token(&json!({"token": "", "accessToken": "c"})).as_deref(),
            Some("c")
        );
    }

    #[test]
    fn looks_inside_data() {
        let body = json!({"message": "ok", "data": {"data": {"token": "deep"}}});
        assert_eq!(extract_token(&body).as_deref(), Some("deep"));
        assert_eq!(extract_token(&json!({"data": "token"})), None);
        assert_eq!(extract_token(&json!(["token"])), None);
    }

    #[test]
    fn store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let now = Utc::now();

        assert_eq!(store.load(now).unwrap(), None);
        store.save("abc", now).unwrap();
        assert_eq!(store.load(now).unwrap().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert_eq!(store.load(now).unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn entries_age_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json")).with_max_age(Duration::hours(1));
        let now = Utc::now();

        store.save("abc", now).unwrap();
        assert!(store.load(now + Duration::minutes(59)).unwrap().is_some());
        assert!(store.load(now + Duration::hours(2)).unwrap().is_none());
    }

    #[test]
    fn require_fresh_checks_exp() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let now = Utc::now();

        assert!(matches!(store.require_fresh(now), Err(SessionError::NotLoggedIn)));

        let stale = jwt::encode_for_test(&json!({"exp": now.timestamp() - 10}));
        store.save(&stale, now).unwrap();
        assert!(matches!(store.require_fresh(now), Err(SessionError::Expired)));

        let fresh = jwt::encode_for_test(&json!({"exp": now.timestamp() + 600}));
        store.save(&fresh, now).unwrap();
        assert_eq!(store.require_fresh(now).unwrap(), fresh);
    }
}
