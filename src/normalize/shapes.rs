//! Envelope aliases and the normalizer itself

use crate::types::{JsonValue, Record};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field names tried when looking for records and pagination metadata.
///
/// Each list is tried in order and the first hit wins. Paths use dot
/// notation (`meta.last_page`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeAliases {
    /// Top-level fields that may hold the record array
    pub records: Vec<String>,
    /// Paths that may hold the last page number
    pub last_page: Vec<String>,
    /// Paths that may hold the current page number
    pub current_page: Vec<String>,
    /// Paths that may hold the total record count
    pub total_count: Vec<String>,
}

impl Default for ShapeAliases {
    fn default() -> Self {
        Self {
            records: strings(&["data", "users", "registrations", "items"]),
            last_page: strings(&[
                "meta.last_page",
                "meta.totalPages",
                "totalPages",
                "pagination.totalPages",
            ]),
            current_page: strings(&["meta.current_page", "currentPage", "page", "pagination.page"]),
            total_count: strings(&["meta.total", "total", "totalCount", "pagination.total"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Pagination metadata reported by one response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page number the response claims to be
    pub current_page: u32,
    /// Last page number; 1 when the response does not say
    pub last_page: u32,
    /// Total record count, when reported
    pub total_count: Option<u64>,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            total_count: None,
        }
    }
}

/// Records and metadata extracted from one response body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPage {
    /// Records in response order
    pub records: Vec<Record>,
    /// Pagination metadata
    pub meta: PageMeta,
}

impl NormalizedPage {
    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page carried no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Best-effort extractor for heterogeneous list responses
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    aliases: ShapeAliases,
}

impl ResponseNormalizer {
    /// Create a normalizer with the default alias lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with custom alias lists
    pub fn with_aliases(aliases: ShapeAliases) -> Self {
        Self { aliases }
    }

    /// The alias lists in use
    pub fn aliases(&self) -> &ShapeAliases {
        &self.aliases
    }

    /// Normalize a response body for the given requested page number
    pub fn normalize(&self, body: &JsonValue, requested_page: u32) -> NormalizedPage {
        let records = self.extract_records(body);
        let meta = PageMeta {
            current_page: self
                .first_number(body, &self.aliases.current_page)
                .map_or(requested_page.max(1), clamp_page),
            last_page: self
                .first_number(body, &self.aliases.last_page)
                .map_or(1, clamp_page),
            total_count: self.first_number(body, &self.aliases.total_count),
        };

        NormalizedPage { records, meta }
    }

    /// Extract just the record list
    pub fn extract_records(&self, body: &JsonValue) -> Vec<Record> {
        let items = match body {
            JsonValue::Array(items) => Some(items),
            JsonValue::Object(map) => self
                .aliases
                .records
                .iter()
                .find_map(|key| map.get(key).and_then(JsonValue::as_array)),
            _ => None,
        };

        let Some(items) = items else {
            debug!("Unrecognized response shape, treating as empty page");
            return Vec::new();
        };

        let mut records = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for item in items {
            match item {
                JsonValue::Object(obj) => records.push(obj.clone()),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("Skipped {} non-object entries in record array", skipped);
        }
        records
    }

    fn first_number(&self, body: &JsonValue, paths: &[String]) -> Option<u64> {
        paths
            .iter()
            .find_map(|path| lookup_path(body, path).and_then(as_count))
    }
}

/// Walk a dot-separated path through nested objects
pub fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Read a non-negative count from a number or numeric string
fn as_count(value: &JsonValue) -> Option<u64> {
    match value {
        // Negative values saturate to 0 so the first present key still wins
        JsonValue::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| s.parse::<i64>().ok().map(|n| n.max(0) as u64))
        }
        _ => None,
    }
}

fn clamp_page(n: u64) -> u32 {
    n.clamp(1, u64::from(u32::MAX)) as u32
}
