//! Pagination
//!
//! Lenient page parsing: anything missing or below 1 falls back to the
//! default, as list endpoints never reject a bad page number.

use serde::{Deserialize, Serialize};

/// Requested page. Values are normalized by [`PageRequest::normalized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// `(page, limit)` with `page >= 1` and `limit >= 1`.
    pub fn normalized(&self, default_limit: usize) -> (usize, usize) {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1) as usize;
        let limit = self
            .limit
            .filter(|l| *l >= 1)
            .map(|l| l as usize)
            .unwrap_or(default_limit.max(1));
        (page, limit)
    }

    /// Slice one page out of `items`, reporting totals.
    pub fn apply<T>(&self, items: Vec<T>, default_limit: usize) -> Paged<T> {
        let (page, limit) = self.normalized(default_limit);
        let total = items.len();
        let items = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        Paged {
            items,
            meta: PageMeta::new(total, page, limit),
        }
    }
}

/// Page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    /// Never below 1, even for an empty result.
    pub total_pages: usize,
}

impl PageMeta {
    pub fn new(total: usize, page: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit).max(1),
        }
    }
}

/// A page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(PageRequest::default().normalized(10), (1, 10));
        assert_eq!(PageRequest::new(0, -5).normalized(10), (1, 10));
        assert_eq!(PageRequest::new(3, 25).normalized(10), (3, 25));
    }

    #[test]
    fn test_apply_slices_and_counts() {
        let paged = PageRequest::new(2, 3).apply((1..=7).collect::<Vec<_>>(), 10);
        assert_eq!(paged.items, vec![4, 5, 6]);
        assert_eq!(paged.meta, PageMeta { total: 7, page: 2, limit: 3, total_pages: 3 });
    }

    #[test]
    fn test_empty_has_one_page() {
        let paged = PageRequest::default().apply(Vec::<u8>::new(), 10);
        assert!(paged.items.is_empty());
        assert_eq!(paged.meta.total_pages, 1);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let paged = PageRequest::new(9, 2).apply(vec![1, 2, 3], 10);
        assert!(paged.items.is_empty());
        assert_eq!(paged.meta.total, 3);
    }
}
