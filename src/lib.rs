// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Donor Dashboard
//!
//! Data core of a drug-testing compliance admin dashboard: donor
//! registrations, users, payments and services, each browsed through a
//! list screen.
//!
//! ## Features
//!
//! - **Response normalization**: Bare arrays and `data` / `users` envelopes
//!   with pagination metadata in any of the backend's spellings
//! - **Paged aggregation**: Every page of a list endpoint merged into one
//!   collection, unique by record id, with partial results on failure
//! - **Filtering**: Free-text search over configured fields plus exact
//!   field filters, as a pure function of the collection
//! - **Client pagination**: A page cursor that stays valid as the filtered
//!   collection changes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use donor_dashboard::{DashboardConfig, HttpClient, ListScreen, PagedCollectionFetcher, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = DashboardConfig::from_file("dashboard.yaml")?;
//!     let client = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
//!     let fetcher = PagedCollectionFetcher::new(client);
//!
//!     let mut donors = ListScreen::from_config(&config, "donors")?;
//!     donors.set_filter("status", "CONFIRMED");
//!     donors.refresh(&fetcher).await;
//!
//!     println!("{}", donors.snapshot().summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          ListScreen                             │
//! │  refresh() → RefreshStatus   set_filter()   set_page()   view() │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Fetch   │ Normalize │    Filter     │ Paginate  │   Images    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Pages    │ Envelopes │ Search        │ Cursor    │ Blob cache  │
//! │ Dedupe   │ Page meta │ Exact match   │ Page view │ URL resolve │
//! │ Stale    │           │               │           │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//!                                │
//!                  HttpClient (auth, retry, rate limit)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Response envelope normalization
pub mod normalize;

/// Paged collection fetching
pub mod fetch;

/// Search and exact-match filtering
pub mod filter;

/// Client-side pagination
pub mod pagination;

/// List screen controller
pub mod screen;

/// Record image cache and URL resolution
pub mod images;

/// Dashboard configuration
pub mod config;

/// Built-in screen definitions
pub mod screens;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{DashboardConfig, FilterDefinition, ScreenDefinition};
pub use fetch::{Collection, EndpointConfig, FetchOutcome, PageSource, PagedCollectionFetcher};
pub use filter::{FilterPipeline, FilterState};
pub use http::HttpClient;
pub use normalize::{NormalizedPage, PageMeta, ResponseNormalizer};
pub use pagination::{ClientPaginator, PageView};
pub use screen::{ListScreen, RefreshStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
