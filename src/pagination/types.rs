//! Pagination types

use serde::Serialize;

/// Rows per page when a screen does not say otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One visible page of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<'a, T> {
    /// Records on this page
    pub items: &'a [T],
    /// 1-based page number shown
    pub current_page: usize,
    /// `max(1, ceil(total_items / page_size))`
    pub total_pages: usize,
    /// Size of the whole (filtered) collection
    pub total_items: usize,
    /// 0-based index of the first visible item
    pub start_index: usize,
    /// Exclusive end index; also the 1-based number of the last visible item
    pub end_index: usize,
    /// Page size in effect
    pub page_size: usize,
    /// Whether "previous" navigation is enabled
    pub has_previous: bool,
    /// Whether "next" navigation is enabled
    pub has_next: bool,
}

impl<T> PageView<'_, T> {
    /// Whether nothing is visible
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based number of the first visible item, or 0 when empty
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.start_index + 1
        }
    }

    /// Footer text such as "Showing 1 to 10 of 25 donors"
    pub fn describe(&self, label: &str) -> String {
        format!(
            "Showing {} to {} of {} {}",
            self.first_item_number(),
            self.end_index,
            self.total_items,
            label
        )
    }
}
