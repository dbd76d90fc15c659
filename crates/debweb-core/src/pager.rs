//! Pagination controls and row expansion

use crate::models::Pagination;

/// Page position as reported by the backend
///
/// `total_pages` always comes from the server; nothing here counts rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: usize,
    total_pages: usize,
}

impl Pager {
    /// `current` is clamped into `[1, max(total_pages, 1)]`
    pub fn new(current: usize, total_pages: usize) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            current: current.clamp(1, total_pages),
            total_pages,
        }
    }

    pub fn from_pagination(pagination: &Pagination) -> Self {
        Self::new(pagination.current_page, pagination.total_pages)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// "Previous" is disabled on the first page
    pub fn prev_disabled(&self) -> bool {
        self.current == 1
    }

    /// "Next" is disabled on the last known page
    pub fn next_disabled(&self) -> bool {
        self.current >= self.total_pages
    }

    pub fn prev_page(&self) -> usize {
        self.current.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        (self.current + 1).min(self.total_pages)
    }

    /// Page an arbitrary jump lands on
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages)
    }

    /// Page numbers for a compact control, at most `width` wide, around the current page
    pub fn window(&self, width: usize) -> Vec<usize> {
        let width = width.max(1).min(self.total_pages);
        let half = width / 2;
        let mut start = self.current.saturating_sub(half).max(1);
        if start + width - 1 > self.total_pages {
            start = self.total_pages + 1 - width;
        }
        (start..start + width).collect()
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// At most one expanded row, tracked by record id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowExpansion {
    expanded: Option<String>,
}

impl RowExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expanded(id: Option<&str>) -> Self {
        Self {
            expanded: id.map(str::to_string),
        }
    }

    /// Expand `id`, or collapse it when it is already the expanded row
    pub fn toggle(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_at_bounds() {
        for total in 1..=5 {
            for current in 1..=total {
                let pager = Pager::new(current, total);
                assert_eq!(pager.prev_disabled(), current == 1);
                assert_eq!(pager.next_disabled(), current == total);
            }
        }
    }

    #[test]
    fn test_never_leaves_range() {
        let pager = Pager::new(1, 3);
        assert_eq!(pager.prev_page(), 1);
        let last = Pager::new(3, 3);
        assert_eq!(last.next_page(), 3);
        assert_eq!(Pager::new(9, 3).current(), 3);
        assert_eq!(Pager::new(0, 3).current(), 1);
        assert_eq!(pager.clamp(42), 3);
    }

    #[test]
    fn test_zero_pages_is_one() {
        let pager = Pager::new(1, 0);
        assert_eq!(pager.total_pages(), 1);
        assert!(pager.prev_disabled());
        assert!(pager.next_disabled());
    }

    #[test]
    fn test_window() {
        assert_eq!(Pager::new(1, 10).window(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(Pager::new(6, 10).window(5), vec![4, 5, 6, 7, 8]);
        assert_eq!(Pager::new(10, 10).window(5), vec![6, 7, 8, 9, 10]);
        assert_eq!(Pager::new(2, 2).window(5), vec![1, 2]);
    }

    #[test]
    fn test_toggle_same_row_collapses() {
        let mut rows = RowExpansion::new();
        rows.toggle("a");
        assert!(rows.is_expanded("a"));
        rows.toggle("a");
        assert_eq!(rows.expanded(), None);
    }

    #[test]
    fn test_only_one_row_expanded() {
        let mut rows = RowExpansion::new();
        rows.toggle("a");
        rows.toggle("b");
        assert!(!rows.is_expanded("a"));
        assert!(rows.is_expanded("b"));
    }
}
