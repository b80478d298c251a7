use json::Value;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::prelude::*;

pub fn now() -> DateTime {
  Utc::now().naive_utc()
}

/// Parses a path id. Anything but a non-negative integer is rejected
/// before the store is touched.
pub fn parse_id(raw: &str, what: &str) -> Result<i32> {
  raw
    .trim()
    .parse::<i32>()
    .ok()
    .filter(|id| *id >= 0)
    .ok_or_else(|| Error::invalid(format!("Invalid {what} id")))
}

/// Coerces a JSON value into a list of platform names.
///
/// Accepts an array, a JSON-encoded string (possibly encoded twice) or a
/// comma-separated string. Anything else is an empty list. Duplicates are
/// dropped, first occurrence wins.
pub fn platforms(value: &Value) -> Vec<String> {
  match value {
    Value::Array(items) => dedup(items.iter().filter_map(|item| match item {
      Value::String(s) => Some(s.trim().to_string()),
      Value::Null => None,
      other => Some(other.to_string()),
    })),
    Value::String(raw) => platforms_from_str(raw),
    _ => Vec::new(),
  }
}

/// Read-side counterpart of [`platforms`] for the stored text column.
pub fn platforms_from_str(raw: &str) -> Vec<String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Vec::new();
  }

  match json::from_str::<Value>(raw) {
    Ok(value @ Value::Array(_)) => platforms(&value),
    Ok(Value::String(inner)) => platforms_from_str(&inner),
    Ok(Value::Null) => Vec::new(),
    _ => dedup(raw.split(',').map(|s| s.trim().to_string())),
  }
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();
  for item in items {
    if !item.is_empty() && !out.contains(&item) {
      out.push(item);
    }
  }
  out
}

pub fn integer(value: &Value) -> Option<i64> {
  match value {
    Value::Number(n) => n.as_i64().or_else(|| {
      n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
    }),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  }
}

/// Non-blank string content of a value.
pub fn text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

pub fn date(value: &Value) -> Option<Date> {
  let raw = text(value)?;
  // accept full timestamps too, keeping the date part
  let day = raw.get(..10).unwrap_or(&raw);
  Date::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Keeps explicit `null` apart from an absent field: absent stays `None`
/// (with `#[serde(default)]`), `null` becomes `Some(Value::Null)`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Value::deserialize(deserializer).map(Some)
}

pub fn verification_code() -> String {
  let hex = Uuid::new_v4().simple().to_string();
  format!("cp-{}", &hex[..16])
}
