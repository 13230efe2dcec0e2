//! Fetch types
//!
//! Endpoint description, the accumulated collection and the outcome of one
//! fetch cycle.

use crate::error::AggregationError;
use crate::types::{ParamMap, Record, RecordId};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Hard upper bound on pages requested in a single cycle
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Description of a paged list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Path relative to the backend base URL (e.g. `/donors/donor-registrations`)
    pub path: String,
    /// Query parameters sent with every page request
    pub static_params: ParamMap,
    /// Query parameter carrying the page number
    pub page_param: String,
    /// Optional page-size parameter name and value
    pub page_size: Option<(String, u32)>,
    /// Maximum number of pages to request
    pub max_pages: u32,
}

impl EndpointConfig {
    /// Create an endpoint config for a path with default page parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            static_params: BTreeMap::new(),
            page_param: "page".to_string(),
            page_size: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Add a static query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_params.insert(key.into(), value.into());
        self
    }

    /// Set the page-size parameter
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size = Some((param.into(), size));
        self
    }

    /// Set the page number parameter name
    #[must_use]
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Full query for a given page number
    pub fn query_for_page(&self, page: u32) -> ParamMap {
        let mut query = self.static_params.clone();
        query.insert(self.page_param.clone(), page.to_string());
        if let Some((param, size)) = &self.page_size {
            query.insert(param.clone(), size.to_string());
        }
        query
    }
}

/// Ordered records of one fetch cycle, unique by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    records: Vec<Record>,
    ids: HashSet<RecordId>,
    duplicates_rejected: usize,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from records, applying the same duplicate rule as `push`
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut collection = Self::new();
        collection.extend(records);
        collection
    }

    /// Append a record.
    ///
    /// A record whose id is already present is rejected and the first
    /// occurrence kept. Returns whether the record was appended.
    pub fn push(&mut self, record: Record) -> bool {
        match RecordId::of(&record) {
            Some(id) => {
                if self.ids.contains(&id) {
                    warn!("Rejected duplicate record id {}", id);
                    self.duplicates_rejected += 1;
                    return false;
                }
                self.ids.insert(id);
            }
            None => warn!("Record without a usable id appended unchecked"),
        }
        self.records.push(record);
        true
    }

    /// Append many records
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.push(record);
        }
    }

    /// Replace the record with the same id in place, or append it.
    ///
    /// Returns `true` when an existing record was replaced.
    pub fn upsert(&mut self, record: Record) -> bool {
        if let Some(id) = RecordId::of(&record) {
            if let Some(slot) = self
                .records
                .iter_mut()
                .find(|r| RecordId::of(r).as_ref() == Some(&id))
            {
                *slot = record;
                return true;
            }
        }
        self.push(record);
        false
    }

    /// Remove the record with the given id
    pub fn remove(&mut self, id: &RecordId) -> Option<Record> {
        let index = self
            .records
            .iter()
            .position(|r| RecordId::of(r).as_ref() == Some(id))?;
        self.ids.remove(id);
        Some(self.records.remove(index))
    }

    /// Look up a record by id
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        if !self.ids.contains(id) {
            return None;
        }
        self.records
            .iter()
            .find(|r| RecordId::of(r).as_ref() == Some(id))
    }

    /// Records in fetch order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Ids of records that carry one
    pub fn ids(&self) -> &HashSet<RecordId> {
        &self.ids
    }

    /// Consume into the record list
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many duplicate-id records were rejected while building this collection
    pub fn duplicates_rejected(&self) -> usize {
        self.duplicates_rejected
    }
}

/// Result of one fetch cycle
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Records accumulated, complete or partial
    pub collection: Collection,
    /// Page requests that succeeded
    pub pages_fetched: u32,
    /// The page cap stopped the loop before the backend reported the last page
    pub truncated: bool,
    /// A newer cycle started while this one was running
    pub stale: bool,
    /// Set when a request failed part-way through
    pub error: Option<AggregationError>,
}

impl FetchOutcome {
    /// Whether every page was fetched without error
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && !self.stale && !self.truncated
    }

    /// Treat any failure as total: return the collection only on success
    pub fn into_result(self) -> std::result::Result<Collection, AggregationError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.collection),
        }
    }
}
