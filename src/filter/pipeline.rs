//! Predicate composition

use super::types::FilterState;
use crate::types::{scalar_text, Record};

/// Filters a collection by search text and exact-match selections.
///
/// A record is kept when the search text is empty or found in ANY of the
/// search fields, AND every active exact filter equals the record's field.
/// Missing or null fields never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPipeline {
    search_fields: Vec<String>,
}

impl FilterPipeline {
    /// Create a pipeline searching the given fields
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Fields the search text is matched against
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Produce the filtered collection, preserving order
    pub fn apply(&self, records: &[Record], state: &FilterState) -> Vec<Record> {
        self.apply_iter(records, state).cloned().collect()
    }

    /// Borrowing variant of `apply`
    pub fn apply_iter<'a>(
        &'a self,
        records: &'a [Record],
        state: &'a FilterState,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        let needle = state.search_text.to_lowercase();
        records.iter().filter(move |record| {
            self.matches_search(record, &needle) && matches_exact(record, state)
        })
    }

    /// Whether a single record passes the filter state
    pub fn matches(&self, record: &Record, state: &FilterState) -> bool {
        self.matches_search(record, &state.search_text.to_lowercase())
            && matches_exact(record, state)
    }

    fn matches_search(&self, record: &Record, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.search_fields.iter().any(|field| {
            record
                .get(field)
                .filter(|v| v.is_string() || v.is_number())
                .and_then(scalar_text)
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }
}

fn matches_exact(record: &Record, state: &FilterState) -> bool {
    state.active_filters().all(|(field, expected)| {
        record
            .get(field)
            .and_then(scalar_text)
            .is_some_and(|actual| actual == expected)
    })
}
