//! Reading JWT claims without verifying them.
//!
//! The client only peeks at the payload to decide whether a stored token is
//! worth sending and which admin commands to offer. The signature is never
//! checked here, so nothing in this module is an authorization decision:
//! the backend verifies the token on every call.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use log::warn;
use serde_json::{Map, Value};

pub type JwtClaims = Map<String, Value>;

/// Decodes the payload segment. Padding is optional; `None` for anything
/// that is not `header.payload[.signature]` with a JSON object payload.
pub fn decode_payload(token: &str) -> Option<JwtClaims> {
    let mut parts = token.split('.');
    let (_header, payload) = (parts.next()?, parts.next()?);

    // Accept the standard alphabet too
    let payload: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = match URL_SAFE_NO_PAD.decode(&payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to decode JWT payload: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Some(claims),
        Ok(_) => None,
        Err(e) => {
            warn!("JWT payload is not JSON: {}", e);
            None
        }
    }
}

pub fn expires_at(claims: &JwtClaims) -> Option<DateTime<Utc>> {
    let exp = claims.get("exp")?.as_f64()?;
    DateTime::from_timestamp(exp.floor() as i64, 0)
}

/// True when the token decodes and its `exp`, if numeric, is still ahead of
/// `now`. Tokens without an `exp` claim are treated as fresh.
pub fn is_token_fresh(token: &str, now: DateTime<Utc>) -> bool {
    let Some(claims) = decode_payload(token) else {
        return false;
    };

    match claims.get("exp").and_then(Value::as_f64) {
        Some(exp) => exp > now.timestamp() as f64,
        None => true,
    }
}

/// `admin == "super_admin"`, on the claims or on a nested `user` object.
pub fn is_super_admin(claims: &JwtClaims) -> bool {
    if claims.get("admin").and_then(Value::as_str) == Some("super_admin") {
        return true;
    }

    match claims.get("user") {
        Some(Value::Object(user)) => is_super_admin(user),
        _ => false,
    }
}

/// Lower-cased role string, from `admin` or `role`.
pub fn role(claims: &JwtClaims) -> Option<String> {
    ["admin", "role"]
        .iter()
        .filter_map(|key| claims.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
