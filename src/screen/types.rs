//! List screen types

use crate::pagination::PageView;
use crate::types::{ParamMap, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// What applying a completed fetch cycle did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshStatus {
    /// Every page arrived
    Loaded {
        records: usize,
        /// The page cap cut the fetch short
        truncated: bool,
    },
    /// A request failed; the records fetched before it are shown
    Partial { records: usize, message: String },
    /// A newer refresh started first; nothing was applied
    Stale,
}

impl RefreshStatus {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// What a filter change requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterChange {
    /// Same value as before
    Unchanged,
    /// The filtered view was recomputed locally
    Recomputed,
    /// The value is a backend query parameter; call `refresh`
    RefetchRequired,
}

impl FilterChange {
    pub fn needs_fetch(self) -> bool {
        matches!(self, Self::RefetchRequired)
    }
}

/// Serializable state of one screen for the CLI and server
#[derive(Debug, Serialize)]
pub struct ScreenSnapshot<'a> {
    pub name: &'a str,
    pub title: &'a str,
    #[serde(flatten)]
    pub page: PageView<'a, Record>,
    /// Footer text, e.g. "Showing 1 to 10 of 25 donors"
    pub summary: String,
    pub search: &'a str,
    pub filters: &'a ParamMap,
    /// Records before filtering
    pub total_records: usize,
    pub duplicates_rejected: usize,
    pub truncated: bool,
    pub last_error: Option<&'a str>,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Resolved image URL per visible record id
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub images: BTreeMap<String, String>,
}
