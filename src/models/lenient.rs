//! `deserialize_with` helpers for backend fields whose JSON type is not
//! reliable. Each one accepts any JSON value and never fails; values of an
//! unusable type read as absent.

use crate::models::RecordId;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&Value::deserialize(de)?))
}

pub(crate) fn string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

pub(crate) fn value_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Only real booleans count.
pub(crate) fn boolean<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(de)?.as_bool())
}

pub(crate) fn value<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Ok(Some(Value::deserialize(de)?).filter(|v| !v.is_null()))
}

pub(crate) fn record_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<RecordId>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => RecordId::Number(i),
            None => RecordId::Text(n.to_string()),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s)),
        _ => None,
    })
}

/// Nested records; the ones that do not fit `T` are left out.
pub(crate) fn records<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(de)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|raw| match T::deserialize(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Dropping nested record: {}", e);
                None
            }
        })
        .collect())
}

/// First non-empty spelling of a field the backend names two ways.
pub(crate) fn either<'a>(first: &'a Option<String>, second: &'a Option<String>) -> Option<&'a str> {
    [first.as_deref(), second.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}
