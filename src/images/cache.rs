//! Per-screen image cache and URL resolution

use crate::types::RecordId;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Image shown when a record has none
pub const DEFAULT_IMAGE: &str = "/default-avatar.png";

/// One cached image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedImage {
    /// Displayable URL; inline blobs are `data:` URLs
    pub url: String,
    pub content_type: Option<String>,
    pub cached_at: DateTime<Utc>,
}

/// Images uploaded or previewed locally, keyed by the owning record
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    entries: HashMap<RecordId, CachedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a URL for a record, replacing any earlier entry
    pub fn insert_url(&mut self, id: RecordId, url: impl Into<String>) {
        self.entries.insert(
            id,
            CachedImage {
                url: url.into(),
                content_type: None,
                cached_at: Utc::now(),
            },
        );
    }

    /// Cache raw image bytes as a `data:` URL and return that URL
    pub fn insert_blob(&mut self, id: RecordId, content_type: &str, bytes: &[u8]) -> String {
        let url = format!("data:{content_type};base64,{}", STANDARD.encode(bytes));
        debug!("Caching {} byte image for record {}", bytes.len(), id);
        self.entries.insert(
            id,
            CachedImage {
                url: url.clone(),
                content_type: Some(content_type.to_string()),
                cached_at: Utc::now(),
            },
        );
        url
    }

    pub fn get(&self, id: &RecordId) -> Option<&CachedImage> {
        self.entries.get(id)
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<CachedImage> {
        self.entries.remove(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose record is no longer present
    pub fn retain_records(&mut self, live: &HashSet<RecordId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| live.contains(id));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns stored image paths into displayable URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    public_base_url: Option<String>,
    default_image: String,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ImageResolver {
    /// `public_base_url` prefixes `/uploads/...` paths
    pub fn new(public_base_url: Option<String>) -> Self {
        Self {
            public_base_url: public_base_url.map(|b| b.trim_end_matches('/').to_string()),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }

    #[must_use]
    pub fn with_default_image(mut self, default_image: impl Into<String>) -> Self {
        self.default_image = default_image.into();
        self
    }

    /// Resolve the image for a record.
    ///
    /// Order: cached image for the record, then `/uploads` paths on the
    /// public base, then absolute URLs as-is, then the path itself. A
    /// missing or blank path gives the default image.
    pub fn resolve(&self, id: Option<&RecordId>, path: Option<&str>, cache: &ImageCache) -> String {
        if let Some(cached) = id.and_then(|id| cache.get(id)) {
            return cached.url.clone();
        }

        let path = match path.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => return self.default_image.clone(),
        };

        if path.starts_with("/uploads") {
            return match &self.public_base_url {
                Some(base) => format!("{base}{path}"),
                None => path.to_string(),
            };
        }

        path.to_string()
    }
}
