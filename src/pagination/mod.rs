//! Client-side pagination
//!
//! Slices a filtered collection into fixed-size pages and keeps a page
//! cursor that stays valid as the collection changes.
//!
//! # Overview
//!
//! - `paginate` - Pure slicing of a collection for a given cursor
//! - `ClientPaginator` - Cursor owner with navigation and self-correction
//! - `PageView` - The visible slice plus derived metadata
//!
//! When a change leaves the cursor past the last page, the cursor goes
//! back to page 1 rather than to the new last page.

mod paginator;
mod types;

pub use paginator::{paginate, total_pages, ClientPaginator};
pub use types::{PageView, DEFAULT_PAGE_SIZE};
