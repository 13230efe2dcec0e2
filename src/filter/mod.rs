//! Record filtering
//!
//! Search text and exact-match selections applied to a collection.
//!
//! # Overview
//!
//! The filter module provides:
//! - `FilterState` - Current search text and exact-filter selections
//! - `FilterPipeline` - Per-screen predicate composition over a collection
//!
//! The filtered view is recomputed from scratch on every change. Collections
//! in this domain hold at most a few thousand records.

mod pipeline;
mod types;

pub use pipeline::FilterPipeline;
pub use types::FilterState;

#[cfg(test)]
mod tests;
