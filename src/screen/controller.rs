//! The list screen controller

use super::types::{FilterChange, RefreshStatus, ScreenSnapshot};
use crate::config::{DashboardConfig, ScreenDefinition};
use crate::error::Result;
use crate::fetch::{
    Collection, CycleToken, EndpointConfig, FetchOutcome, Generation, PageSource,
    PagedCollectionFetcher,
};
use crate::filter::{FilterPipeline, FilterState};
use crate::images::{ImageCache, ImageResolver};
use crate::pagination::{ClientPaginator, PageView};
use crate::types::{Record, RecordId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// One admin list screen.
///
/// Owns the collection of the latest fetch cycle, the filter state, the
/// page cursor and the screen's image cache. Every change to the data or
/// the filters recomputes the filtered view and re-checks the cursor.
#[derive(Debug)]
pub struct ListScreen {
    definition: ScreenDefinition,
    max_pages: u32,
    pipeline: FilterPipeline,
    filters: FilterState,
    paginator: ClientPaginator,
    collection: Collection,
    filtered: Vec<Record>,
    generation: Generation,
    last_error: Option<String>,
    truncated: bool,
    refreshed_at: Option<DateTime<Utc>>,
    images: ImageCache,
    resolver: ImageResolver,
}

impl ListScreen {
    /// Create an empty screen
    pub fn new(definition: ScreenDefinition, page_size: usize, max_pages: u32) -> Self {
        let page_size = definition.page_size.unwrap_or(page_size);
        Self {
            pipeline: FilterPipeline::new(definition.search_fields.iter().cloned()),
            definition,
            max_pages,
            filters: FilterState::new(),
            paginator: ClientPaginator::new(page_size),
            collection: Collection::new(),
            filtered: Vec::new(),
            generation: Generation::new(),
            last_error: None,
            truncated: false,
            refreshed_at: None,
            images: ImageCache::new(),
            resolver: ImageResolver::default(),
        }
    }

    /// Build the named screen from a dashboard config
    pub fn from_config(config: &DashboardConfig, name: &str) -> Result<Self> {
        let definition = config.screen(name)?.clone();
        Ok(Self::new(definition, config.page_size, config.max_pages)
            .with_image_resolver(ImageResolver::new(config.public_base_url.clone())))
    }

    #[must_use]
    pub fn with_image_resolver(mut self, resolver: ImageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Override rows per page; the cursor goes back to page 1
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.paginator = ClientPaginator::new(page_size);
        self.paginator.reconcile(self.filtered.len());
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &ScreenDefinition {
        &self.definition
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Records of the latest cycle, unfiltered
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Records passing the current filters
    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    /// User-facing message of the last failed refresh
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// No usable data yet: never refreshed, or the last refresh failed
    /// before a single record arrived
    pub fn needs_load(&self) -> bool {
        self.refreshed_at.is_none() || (self.last_error.is_some() && self.collection.is_empty())
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    // ========================================================================
    // Fetch cycles
    // ========================================================================

    /// Endpoint for the next refresh, carrying server-side search and filters
    pub fn endpoint(&self) -> EndpointConfig {
        let mut endpoint = self
            .definition
            .endpoint(self.paginator.page_size(), self.max_pages);

        if let Some(param) = &self.definition.server_search_param {
            if !self.filters.search_text.is_empty() {
                endpoint = endpoint.param(param.clone(), self.filters.search_text.clone());
            }
        }
        for (field, value) in self.filters.active_filters() {
            if self.definition.filter(field).is_some_and(|f| f.server) {
                endpoint = endpoint.param(field, value);
            }
        }
        endpoint
    }

    /// The part of the filter state applied locally.
    ///
    /// Search and filters the backend already applied are left out.
    pub fn client_filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        if self.definition.server_search_param.is_none() {
            state.search_text = self.filters.search_text.clone();
        }
        for (field, value) in self.filters.active_filters() {
            if !self.definition.is_server_param(field) {
                state.set_filter(field, value);
            }
        }
        state
    }

    /// Start a fetch cycle, superseding any cycle still running
    pub fn begin_refresh(&self) -> CycleToken {
        let token = self.generation.advance();
        debug!("Screen {} starting fetch cycle {}", self.name(), token.value());
        token
    }

    /// Apply a finished fetch cycle.
    ///
    /// Outcomes of superseded cycles are dropped. A failed cycle still
    /// replaces the collection with whatever it fetched, and the failure
    /// is kept as `last_error`.
    pub fn complete_refresh(&mut self, token: &CycleToken, outcome: FetchOutcome) -> RefreshStatus {
        if outcome.stale || token.is_stale() {
            debug!(
                "Screen {} discarding stale cycle {} (current {})",
                self.name(),
                token.value(),
                self.generation.current()
            );
            return RefreshStatus::Stale;
        }

        self.collection = outcome.collection;
        self.truncated = outcome.truncated;
        self.refreshed_at = Some(Utc::now());
        let dropped = self.images.retain_records(self.collection.ids());
        if dropped > 0 {
            debug!("Screen {} dropped {} orphaned image(s)", self.name(), dropped);
        }
        self.recompute();

        let records = self.collection.len();
        match outcome.error {
            Some(err) => {
                let message = err.source.user_message();
                warn!(
                    "Screen {} loaded partially ({} record(s)): {}",
                    self.name(),
                    records,
                    err
                );
                self.last_error = Some(message.clone());
                RefreshStatus::Partial { records, message }
            }
            None => {
                info!(
                    "Screen {} loaded {} record(s), {} after filters",
                    self.name(),
                    records,
                    self.filtered.len()
                );
                self.last_error = None;
                RefreshStatus::Loaded {
                    records,
                    truncated: outcome.truncated,
                }
            }
        }
    }

    /// Run a whole fetch cycle against `fetcher` and apply it
    pub async fn refresh<S: PageSource>(
        &mut self,
        fetcher: &PagedCollectionFetcher<S>,
    ) -> RefreshStatus {
        let token = self.begin_refresh();
        let endpoint = self.endpoint();
        let outcome = fetcher.fetch_all_guarded(&endpoint, &token).await;
        self.complete_refresh(&token, outcome)
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Change the search text
    pub fn set_search(&mut self, text: impl Into<String>) -> FilterChange {
        let text = text.into();
        if text == self.filters.search_text {
            return FilterChange::Unchanged;
        }
        self.filters.search_text = text;
        if self.definition.server_search_param.is_some() {
            return FilterChange::RefetchRequired;
        }
        self.recompute();
        FilterChange::Recomputed
    }

    /// Set one exact filter; an empty value clears it
    pub fn set_filter(&mut self, field: &str, value: impl Into<String>) -> FilterChange {
        if !self.filters.set_filter(field, value) {
            return FilterChange::Unchanged;
        }
        if self.definition.filter(field).is_some_and(|f| f.server) {
            return FilterChange::RefetchRequired;
        }
        self.recompute();
        FilterChange::Recomputed
    }

    /// Clear the search text and every filter
    pub fn clear_filters(&mut self) -> FilterChange {
        if self.filters.is_empty() {
            return FilterChange::Unchanged;
        }
        let server_side = (self.definition.server_search_param.is_some()
            && !self.filters.search_text.is_empty())
            || self
                .filters
                .active_filters()
                .any(|(field, _)| self.definition.is_server_param(field));

        self.filters = FilterState::new();
        if server_side {
            return FilterChange::RefetchRequired;
        }
        self.recompute();
        FilterChange::Recomputed
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Jump to a page; clamped into range. Returns the page now shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.paginator.set_cursor(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginator.previous_page()
    }

    /// The visible page
    pub fn view(&self) -> PageView<'_, Record> {
        self.paginator.view(&self.filtered)
    }

    // ========================================================================
    // Local edits
    // ========================================================================

    /// Replace a record after an edit, or add a new one
    pub fn upsert_record(&mut self, record: Record) -> bool {
        let replaced = self.collection.upsert(record);
        self.recompute();
        replaced
    }

    /// Drop a deleted record and its cached image
    pub fn remove_record(&mut self, id: &RecordId) -> Option<Record> {
        let removed = self.collection.remove(id)?;
        self.images.remove(id);
        self.recompute();
        Some(removed)
    }

    /// Image URL for a record, if this screen shows images
    pub fn image_url(&self, record: &Record) -> Option<String> {
        let field = self.definition.image_field.as_deref()?;
        let path = record.get(field).and_then(|v| v.as_str());
        Some(
            self.resolver
                .resolve(RecordId::of(record).as_ref(), path, &self.images),
        )
    }

    /// Serializable state of the visible page
    pub fn snapshot(&self) -> ScreenSnapshot<'_> {
        let page = self.view();
        let summary = page.describe(self.definition.item_label());

        let mut images = BTreeMap::new();
        for record in page.items {
            if let (Some(id), Some(url)) = (RecordId::of(record), self.image_url(record)) {
                images.insert(id.to_string(), url);
            }
        }

        ScreenSnapshot {
            name: &self.definition.name,
            title: self.definition.title(),
            page,
            summary,
            search: &self.filters.search_text,
            filters: &self.filters.exact_filters,
            total_records: self.collection.len(),
            duplicates_rejected: self.collection.duplicates_rejected(),
            truncated: self.truncated,
            last_error: self.last_error.as_deref(),
            refreshed_at: self.refreshed_at,
            images,
        }
    }

    fn recompute(&mut self) {
        let state = self.client_filter_state();
        self.filtered = self.pipeline.apply(self.collection.records(), &state);
        if self.paginator.reconcile(self.filtered.len()) {
            debug!("Screen {} cursor reset to page 1", self.name());
        }
    }
}
