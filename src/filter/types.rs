//! Filter state

use crate::types::ParamMap;
use serde::{Deserialize, Serialize};

/// Search text plus exact-match selections for one screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Case-insensitive substring searched across the screen's search fields
    pub search_text: String,
    /// Field name to required value; empty values are ignored
    pub exact_filters: ParamMap,
}

impl FilterState {
    /// Create an empty filter state (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Add an exact filter
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.exact_filters.insert(field.into(), value.into());
        self
    }

    /// Set or clear (with an empty value) one exact filter.
    ///
    /// Returns whether the state changed.
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let field = field.into();
        let value = value.into();
        if value.is_empty() {
            return self.exact_filters.remove(&field).is_some();
        }
        self.exact_filters.insert(field, value.clone()) != Some(value)
    }

    /// Exact filters that actually constrain the result
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.exact_filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether this state matches every record
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.active_filters().next().is_none()
    }
}
