//! List screens
//!
//! A `ListScreen` is one admin table (donors, users, payments, services)
//! driven by a `ScreenDefinition`. It ties the paged fetcher, the filter
//! pipeline and the paginator together:
//!
//! ```text
//! refresh ──► PagedCollectionFetcher ──► Collection
//!                                          │
//!            FilterState ──► FilterPipeline ┘──► filtered ──► ClientPaginator ──► PageView
//! ```
//!
//! Each refresh runs under a `CycleToken`; an outcome whose token has been
//! superseded by a later refresh is discarded.

mod controller;
mod types;

pub use controller::ListScreen;
pub use types::{FilterChange, RefreshStatus, ScreenSnapshot};
