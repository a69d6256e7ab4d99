//! Pagination state and slicing for record tables
//!
//! The slicer itself never clamps: asking for a page past the end yields
//! an empty slice. Callers keep `current_page` inside `[1, page_count]`
//! via [`Pagination::clamp`].

use serde::{Deserialize, Serialize};

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Number of pages needed for `total` rows (at least one)
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// The rows of 1-based page `page`
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let page_size = page_size.max(1);
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Pagination state for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub current_page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Page sizes offered to the user
    pub available_page_sizes: Vec<usize>,
    /// Rows in the filtered result the last time it was derived
    pub total_records: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_records: 0,
            available_page_sizes: vec![10, 25, 50, 100],
        }
    }

    /// Calculate total number of pages
    pub fn total_pages(&self) -> usize {
        page_count(self.total_records, self.page_size)
    }

    /// Index of the first row on the current page
    pub fn offset(&self) -> usize {
        (self.current_page.max(1) - 1) * self.page_size
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Navigate to next page; returns true if the page changed
    pub fn go_next(&mut self) -> bool {
        if self.can_go_next() {
            self.current_page += 1;
            return true;
        }
        false
    }

    /// Navigate to previous page; returns true if the page changed
    pub fn go_prev(&mut self) -> bool {
        if self.can_go_prev() {
            self.current_page -= 1;
            return true;
        }
        false
    }

    pub fn go_first(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn go_last(&mut self) -> bool {
        self.go_to_page(self.total_pages())
    }

    /// Request a specific page.
    ///
    /// Only the lower bound is enforced here. `total_records` may be stale
    /// until the next [`Pagination::clamp`], which pulls an out-of-range
    /// request back to the last page.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let new_page = page.max(1);
        if self.current_page != new_page {
            self.current_page = new_page;
            return true;
        }
        false
    }

    /// Change rows per page; resets to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if self.page_size != page_size {
            self.page_size = page_size;
            self.current_page = 1;
            return true;
        }
        false
    }

    /// Return to the first page (after the search term or filters change)
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Record the size of a freshly derived result and pull the current
    /// page back into range if it shrank
    pub fn clamp(&mut self, total_records: usize) {
        self.total_records = total_records;
        let max_page = self.total_pages();
        if self.current_page > max_page || self.current_page == 0 {
            tracing::debug!(
                from = self.current_page,
                to = max_page.min(self.current_page.max(1)),
                "clamping page into range"
            );
            self.current_page = self.current_page.clamp(1, max_page);
        }
    }

    /// Get status text (e.g., "25 records in page 1 of 3 (52 total)")
    pub fn status_text(&self, rows_in_page: usize) -> String {
        format!(
            "{} records in page {} of {} ({} total)",
            rows_in_page,
            self.current_page,
            self.total_pages(),
            self.total_records
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_boundaries() {
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(page_count(52, 25), 3);
    }

    #[test]
    fn test_last_partial_page_and_out_of_range() {
        let items: Vec<usize> = (0..52).collect();
        assert_eq!(paginate(&items, 25, 1).len(), 25);
        assert_eq!(paginate(&items, 25, 3), &[50, 51]);
        assert!(paginate(&items, 25, 4).is_empty());
        assert!(paginate(&items, 25, 0).is_empty());
    }

    #[test]
    fn test_pages_cover_all_items_once() {
        let items: Vec<usize> = (0..37).collect();
        for size in 1..=40 {
            let pages = page_count(items.len(), size);
            let joined: Vec<usize> = (1..=pages)
                .flat_map(|p| paginate(&items, size, p).iter().copied())
                .collect();
            assert_eq!(joined, items, "page size {}", size);
        }
    }

    #[test]
    fn test_navigation() {
        let mut pagination = Pagination::new(25);
        pagination.clamp(52);
        assert!(pagination.can_go_next());
        assert!(!pagination.can_go_prev());
        assert!(pagination.go_last());
        assert_eq!(pagination.current_page, 3);
        assert!(!pagination.go_next());
        assert!(pagination.go_prev());
        assert_eq!(pagination.offset(), 25);
        assert!(pagination.go_first());
        assert!(!pagination.go_first());
    }

    #[test]
    fn test_go_to_page_is_clamped_by_next_derive() {
        let mut pagination = Pagination::new(10);
        assert!(pagination.go_to_page(2));
        assert_eq!(pagination.current_page, 2);

        pagination.go_to_page(99);
        pagination.clamp(30);
        assert_eq!(pagination.current_page, 3);
        pagination.go_to_page(0);
        assert_eq!(pagination.current_page, 1);
    }

    #[test]
    fn test_clamp_after_result_shrinks() {
        let mut pagination = Pagination::new(10);
        pagination.clamp(100);
        pagination.go_to_page(8);
        pagination.clamp(15);
        assert_eq!(pagination.current_page, 2);
        pagination.clamp(0);
        assert_eq!(pagination.current_page, 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut pagination = Pagination::new(10);
        pagination.clamp(100);
        pagination.go_to_page(5);
        assert!(pagination.set_page_size(50));
        assert_eq!(pagination.current_page, 1);
        assert!(!pagination.set_page_size(50));
    }

    #[test]
    fn test_status_text() {
        let mut pagination = Pagination::new(25);
        pagination.clamp(52);
        assert_eq!(pagination.status_text(25), "25 records in page 1 of 3 (52 total)");
    }
}
