//! Paged collection fetching
//!
//! Drives sequential page requests against a list endpoint and merges the
//! pages into one in-memory `Collection`.
//!
//! # Overview
//!
//! The fetch module provides:
//! - `EndpointConfig` - Path, static query parameters and page parameters
//! - `PageSource` - The HTTP collaborator that returns one raw page
//! - `PagedCollectionFetcher` - The page loop with its termination rules
//! - `Generation` / `CycleToken` - Detection of superseded fetch cycles

mod fetcher;
mod generation;
mod types;

pub use fetcher::{PageSource, PagedCollectionFetcher};
pub use generation::{CycleToken, Generation};
pub use types::{Collection, EndpointConfig, FetchOutcome, DEFAULT_MAX_PAGES};
