//! Page-number pagination over ordered result sets.
//!
//! Requested page numbers never fail: anything below 1 resolves to the first
//! page and anything past the end resolves to the last one. An empty result
//! set yields a single empty page numbered 1 with `total_pages == 0`.

use serde::Serialize;

use crate::error::DomainError;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Splits ordered sequences into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self, DomainError> {
        if page_size == 0 {
            return Err(DomainError::validation("page size must be at least 1"));
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Resolve `requested` against `count` items into the window to fetch.
    pub fn locate(&self, count: usize, requested: i64) -> PageWindow {
        let total_pages = self.total_pages(count);
        let number = if total_pages == 0 {
            1
        } else {
            usize::try_from(requested.max(1))
                .unwrap_or(usize::MAX)
                .min(total_pages)
        };
        let offset = (number - 1) * self.page_size;
        let limit = count.saturating_sub(offset).min(self.page_size);

        PageWindow {
            number,
            total_pages,
            count,
            offset,
            limit,
            page_size: self.page_size,
        }
    }

    /// Slice an in-memory ordered sequence.
    pub fn paginate<T>(&self, items: Vec<T>, requested: i64) -> Page<T> {
        let window = self.locate(items.len(), requested);
        let slice = items
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect();
        window.into_page(slice)
    }
}

/// A resolved page position: which page, and which rows back it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub total_pages: usize,
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
    page_size: usize,
}

impl PageWindow {
    /// Attach the rows fetched for this window.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        debug_assert!(items.len() <= self.limit);
        Page {
            items,
            number: self.number,
            total_pages: self.total_pages,
            count: self.count,
            page_size: self.page_size,
        }
    }
}

/// A single page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub number: usize,
    /// Total number of pages; zero when there are no items.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn start_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.number - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item on this page, 0 when empty.
    pub fn end_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.start_index() + self.items.len() - 1
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
            count: self.count,
            page_size: self.page_size,
        }
    }
}

/// Read the `page` query value. Missing or non-numeric input means page 1.
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_thirteen_items_split_ten_and_three() {
        let paginator = Paginator::default();

        let first = paginator.paginate(items(13), 1);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = paginator.paginate(items(13), 2);
        assert_eq!(second.items, vec![10, 11, 12]);
        assert_eq!(second.total_pages, 2);
        assert!(!second.has_next());
        assert!(second.has_previous());
        assert_eq!(second.start_index(), 11);
        assert_eq!(second.end_index(), 13);
    }

    #[test]
    fn test_pages_concatenate_to_full_sequence() {
        let paginator = Paginator::default();
        for n in [0, 1, 9, 10, 11, 20, 21, 57] {
            let total_pages = paginator.total_pages(n);
            let mut seen = Vec::new();
            for p in 1..=total_pages {
                seen.extend(paginator.paginate(items(n), p as i64).items);
            }
            assert_eq!(seen, items(n), "n = {n}");
        }
    }

    #[test]
    fn test_empty_collection() {
        let paginator = Paginator::default();
        for requested in [-3, 0, 1, 2, 100] {
            let page = paginator.paginate(Vec::<u8>::new(), requested);
            assert!(page.items.is_empty());
            assert_eq!(page.total_pages, 0);
            assert_eq!(page.number, 1);
            assert!(!page.has_next());
            assert!(!page.has_previous());
            assert_eq!(page.start_index(), 0);
        }
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let paginator = Paginator::default();

        let low = paginator.paginate(items(25), 0);
        assert_eq!(low.number, 1);
        assert_eq!(low.items, items(10));

        let negative = paginator.paginate(items(25), -7);
        assert_eq!(negative.number, 1);

        let high = paginator.paginate(items(25), 99);
        assert_eq!(high.number, 3);
        assert_eq!(high.items, vec![20, 21, 22, 23, 24]);

        let huge = paginator.paginate(items(25), i64::MAX);
        assert_eq!(huge.number, 3);
    }

    #[test]
    fn test_exact_multiple_has_full_last_page() {
        let page = Paginator::default().paginate(items(20), 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.next_page_number(), None);
        assert_eq!(page.previous_page_number(), Some(1));
    }

    #[test]
    fn test_locate_window() {
        let paginator = Paginator::new(4).unwrap();
        let window = paginator.locate(10, 3);
        assert_eq!(window.number, 3);
        assert_eq!(window.offset, 8);
        assert_eq!(window.limit, 2);

        let empty = paginator.locate(0, 5);
        assert_eq!(empty.offset, 0);
        assert_eq!(empty.limit, 0);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(Paginator::new(0), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number(None), 1);
        assert_eq!(parse_page_number(Some("3")), 3);
        assert_eq!(parse_page_number(Some(" 2 ")), 2);
        assert_eq!(parse_page_number(Some("-1")), -1);
        assert_eq!(parse_page_number(Some("last")), 1);
        assert_eq!(parse_page_number(Some("")), 1);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Paginator::default().paginate(items(13), 2).map(|n| n * 2);
        assert_eq!(page.items, vec![20, 22, 24]);
        assert_eq!(page.number, 2);
        assert_eq!(page.count, 13);
    }

    #[test]
    fn test_page_serializes() {
        let page = Paginator::default().paginate(vec!["a"], 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!(["a"]));
        assert_eq!(json["total_pages"], 1);
        assert_eq!(json["page_size"], 10);
    }
}
