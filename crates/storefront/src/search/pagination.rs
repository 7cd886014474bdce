//! Pagination descriptor for a results page.

use serde::Serialize;

/// Number of page links shown around the current page.
pub const PAGE_WINDOW: u32 = 5;

/// One entry between the previous and next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLink {
    Number { page: u32, current: bool },
    Ellipsis,
}

impl PageLink {
    /// Page number of a numbered link.
    #[must_use]
    pub const fn number(&self) -> Option<u32> {
        match self {
            Self::Number { page, .. } => Some(*page),
            Self::Ellipsis => None,
        }
    }

    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Number { current: true, .. })
    }
}

/// Page controls for the current result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub links: Vec<PageLink>,
}

impl Pagination {
    /// Build controls for page `current` of `count` results.
    ///
    /// Returns `None` when there is nothing to page through: no results, or
    /// everything fits on the first page. Previous and next follow the
    /// catalog's continuation tokens rather than the computed page count.
    #[must_use]
    pub fn build(
        count: u64,
        current: u32,
        page_size: u32,
        has_previous: bool,
        has_next: bool,
    ) -> Option<Self> {
        if count == 0 || page_size == 0 || (count <= u64::from(page_size) && current == 1) {
            return None;
        }

        let total_pages =
            u32::try_from(count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX);

        let mut start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
        let end = total_pages.min(start.saturating_add(PAGE_WINDOW - 1));
        if end.saturating_sub(start) + 1 < PAGE_WINDOW {
            start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
        }

        let mut links = Vec::with_capacity(PAGE_WINDOW as usize + 2);
        if start > 1 {
            links.push(PageLink::Ellipsis);
        }
        links.extend((start..=end).map(|page| PageLink::Number {
            page,
            current: page == current,
        }));
        if end < total_pages {
            links.push(PageLink::Ellipsis);
        }

        Some(Self {
            current,
            total_pages,
            has_previous,
            has_next,
            links,
        })
    }

    /// Whether a click on page `page` should trigger navigation.
    #[must_use]
    pub fn is_navigable(&self, page: u32) -> bool {
        page != self.current
            && self
                .links
                .iter()
                .any(|link| matches!(link, PageLink::Number { page: p, .. } if *p == page))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn numbers(pagination: &Pagination) -> Vec<u32> {
        pagination.links.iter().filter_map(PageLink::number).collect()
    }

    #[test]
    fn test_no_controls_for_single_page() {
        assert!(Pagination::build(0, 1, 21, false, false).is_none());
        assert!(Pagination::build(21, 1, 21, false, false).is_none());
        assert!(Pagination::build(22, 1, 21, false, true).is_some());
    }

    #[test]
    fn test_window_at_start() {
        let pagination = Pagination::build(210, 1, 21, false, true).unwrap();
        assert_eq!(pagination.total_pages, 10);
        assert_eq!(numbers(&pagination), vec![1, 2, 3, 4, 5]);
        assert_eq!(pagination.links.first(), Some(&PageLink::Number { page: 1, current: true }));
        assert_eq!(pagination.links.last(), Some(&PageLink::Ellipsis));
    }

    #[test]
    fn test_window_in_middle() {
        let pagination = Pagination::build(210, 6, 21, true, true).unwrap();
        assert_eq!(numbers(&pagination), vec![4, 5, 6, 7, 8]);
        assert_eq!(pagination.links.first(), Some(&PageLink::Ellipsis));
        assert_eq!(pagination.links.last(), Some(&PageLink::Ellipsis));
    }

    #[test]
    fn test_window_shifts_at_end() {
        let pagination = Pagination::build(210, 10, 21, true, false).unwrap();
        assert_eq!(numbers(&pagination), vec![6, 7, 8, 9, 10]);
        assert_eq!(pagination.links.first(), Some(&PageLink::Ellipsis));
        assert_eq!(pagination.links.len(), 6);
        assert!(!pagination.has_next);
    }

    #[test]
    fn test_few_pages() {
        let pagination = Pagination::build(50, 2, 21, true, true).unwrap();
        assert_eq!(numbers(&pagination), vec![1, 2, 3]);
        assert!(!pagination.links.contains(&PageLink::Ellipsis));
    }

    #[test]
    fn test_is_navigable() {
        let pagination = Pagination::build(210, 3, 21, true, true).unwrap();
        assert!(pagination.is_navigable(4));
        assert!(!pagination.is_navigable(3));
        assert!(!pagination.is_navigable(9));
    }
}
