//! Paging arithmetic and the cursor owner

use super::types::{PageView, DEFAULT_PAGE_SIZE};
use tracing::debug;

/// Number of pages for a collection; never less than 1
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` for page `cursor` (1-based).
///
/// A cursor past the end yields an empty slice; a cursor of 0 is read as 1.
pub fn paginate<T>(items: &[T], page_size: usize, cursor: usize) -> PageView<'_, T> {
    let page_size = page_size.max(1);
    let cursor = cursor.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);

    let start_index = cursor
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_items);
    let end_index = start_index.saturating_add(page_size).min(total_items);

    PageView {
        items: &items[start_index..end_index],
        current_page: cursor,
        total_pages,
        total_items,
        start_index,
        end_index,
        page_size,
        has_previous: total_pages > 1 && cursor > 1,
        has_next: total_pages > 1 && cursor < total_pages,
    }
}

/// Owns the page cursor of one screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPaginator {
    page_size: usize,
    cursor: usize,
    total_items: usize,
}

impl Default for ClientPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ClientPaginator {
    /// Create a paginator on page 1; a page size of 0 is read as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            cursor: 1,
            total_items: 0,
        }
    }

    /// Rows per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current 1-based page
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Size of the collection the cursor is measured against
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Page count for the current collection size
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Re-check the cursor after the collection changed size.
    ///
    /// If the cursor now points past the last page it resets to 1.
    /// Returns whether it was reset.
    pub fn reconcile(&mut self, total_items: usize) -> bool {
        self.total_items = total_items;
        if self.cursor > self.total_pages() {
            debug!(
                "Page {} beyond {} page(s), resetting to 1",
                self.cursor,
                self.total_pages()
            );
            self.cursor = 1;
            return true;
        }
        false
    }

    /// Jump to a page, clamped into `1..=total_pages`. Returns the new cursor.
    pub fn set_cursor(&mut self, page: usize) -> usize {
        self.cursor = page.clamp(1, self.total_pages());
        self.cursor
    }

    /// Whether `previous_page` would move
    pub fn has_previous(&self) -> bool {
        self.total_pages() > 1 && self.cursor > 1
    }

    /// Whether `next_page` would move
    pub fn has_next(&self) -> bool {
        self.total_pages() > 1 && self.cursor < self.total_pages()
    }

    /// Go back one page; no-op on the first page. Returns whether it moved.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Go forward one page; no-op on the last page. Returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Visible page of `items` at the current cursor.
    ///
    /// `items` should be the collection last passed to `reconcile`.
    pub fn view<'a, T>(&self, items: &'a [T]) -> PageView<'a, T> {
        paginate(items, self.page_size, self.cursor)
    }
}
