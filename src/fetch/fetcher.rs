//! The paged fetch loop

use super::generation::CycleToken;
use super::types::{EndpointConfig, FetchOutcome};
use crate::error::{AggregationError, Result};
use crate::normalize::ResponseNormalizer;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of raw list pages.
///
/// The HTTP client implements this; request headers, auth and timeouts are
/// its concern, not the fetcher's.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page of an endpoint and return the raw JSON body
    async fn fetch_page(&self, endpoint: &EndpointConfig, page: u32) -> Result<JsonValue>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch_page(&self, endpoint: &EndpointConfig, page: u32) -> Result<JsonValue> {
        (**self).fetch_page(endpoint, page).await
    }
}

/// Fetches every page of an endpoint into a single collection
#[derive(Debug, Clone)]
pub struct PagedCollectionFetcher<S> {
    source: S,
    normalizer: ResponseNormalizer,
}

impl<S: PageSource> PagedCollectionFetcher<S> {
    /// Create a fetcher with the default response normalizer
    pub fn new(source: S) -> Self {
        Self {
            source,
            normalizer: ResponseNormalizer::new(),
        }
    }

    /// Use a custom normalizer
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch all pages of `endpoint`.
    ///
    /// Requests are strictly sequential. The loop ends at the last page the
    /// backend reports, on the first empty page, at the page cap, or on the
    /// first failed request. On failure the records already accumulated are
    /// returned together with the error.
    pub async fn fetch_all(&self, endpoint: &EndpointConfig) -> FetchOutcome {
        self.run(endpoint, None).await
    }

    /// Like `fetch_all`, but stops requesting as soon as `token` is superseded
    pub async fn fetch_all_guarded(
        &self,
        endpoint: &EndpointConfig,
        token: &CycleToken,
    ) -> FetchOutcome {
        self.run(endpoint, Some(token)).await
    }

    async fn run(&self, endpoint: &EndpointConfig, token: Option<&CycleToken>) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let mut page = 1u32;

        loop {
            if token.is_some_and(CycleToken::is_stale) {
                debug!(
                    "Fetch cycle for {} superseded before page {}",
                    endpoint.path, page
                );
                outcome.stale = true;
                return outcome;
            }

            let body = match self.source.fetch_page(endpoint, page).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        "Page {} of {} failed after {} record(s): {}",
                        page,
                        endpoint.path,
                        outcome.collection.len(),
                        e
                    );
                    outcome.error = Some(AggregationError::new(
                        outcome.pages_fetched,
                        outcome.collection.len(),
                        e,
                    ));
                    break;
                }
            };
            outcome.pages_fetched += 1;

            let normalized = self.normalizer.normalize(&body, page);
            if normalized.is_empty() {
                debug!("Page {} of {} is empty, stopping", page, endpoint.path);
                break;
            }

            // Last-seen value governs termination
            let last_page = normalized.meta.last_page;
            debug!(
                "Page {}/{} of {}: {} record(s)",
                page,
                last_page,
                endpoint.path,
                normalized.len()
            );
            outcome.collection.extend(normalized.records);

            if page >= last_page {
                break;
            }
            if page >= endpoint.max_pages {
                warn!(
                    "Stopped {} at page cap {} (backend reports {} pages)",
                    endpoint.path, endpoint.max_pages, last_page
                );
                outcome.truncated = true;
                break;
            }
            page += 1;
        }

        if token.is_some_and(CycleToken::is_stale) {
            outcome.stale = true;
        }

        info!(
            "Fetched {} record(s) from {} in {} page(s)",
            outcome.collection.len(),
            endpoint.path,
            outcome.pages_fetched
        );
        outcome
    }
}
