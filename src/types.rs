//! Common types used throughout the dashboard core
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One domain entity (donor registration, payment, service or user).
///
/// The core treats every field as opaque except `id` and the field names
/// a screen's filters refer to.
pub type Record = JsonObject;

/// Ordered string parameters (query params, filter selections)
pub type ParamMap = BTreeMap<String, String>;

// ============================================================================
// Record Identity
// ============================================================================

/// Identity of a record, taken from its `id` field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer id (most backend tables)
    Int(i64),
    /// String id (UUIDs, panel ids)
    Str(String),
}

impl RecordId {
    /// Extract the id of a record, if it has a usable one
    pub fn of(record: &Record) -> Option<Self> {
        match record.get("id")? {
            JsonValue::Number(n) => n.as_i64().map(RecordId::Int),
            JsonValue::String(s) if !s.is_empty() => Some(RecordId::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Str(id.to_string())
    }
}

/// Render a scalar JSON value the way filter predicates compare it.
///
/// Strings are returned as-is, numbers and booleans in their JSON form.
/// Null, arrays and objects have no scalar rendering.
pub fn scalar_text(value: &JsonValue) -> Option<std::borrow::Cow<'_, str>> {
    use std::borrow::Cow;
    match value {
        JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
        JsonValue::Number(n) => Some(Cow::Owned(n.to_string())),
        JsonValue::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

// ============================================================================
// HTTP Types
// ============================================================================

/// Backoff strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Fixed delay between retries
    Constant,
    /// Linearly increasing delay
    Linear,
    /// Exponentially increasing delay
    #[default]
    Exponential,
}
