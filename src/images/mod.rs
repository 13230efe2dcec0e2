//! Image cache module
//!
//! Each list screen owns an `ImageCache` for images uploaded or previewed
//! in this session, keyed by record id. `ImageResolver` turns a record's
//! stored image path into a URL, preferring the cached copy.

mod cache;

pub use cache::{CachedImage, ImageCache, ImageResolver, DEFAULT_IMAGE};
