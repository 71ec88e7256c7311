//! Offset pagination: request validation, window derivation and the
//! paginated result handed back to callers.

use super::errors::{DomainError, DomainResult};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Default and maximum page sizes, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl PaginationPolicy {
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Validate the requested page and page size.
    ///
    /// `page` defaults to 1 and `limit` to `default_limit`. Zero, negative
    /// or over-max values are rejected, never clamped.
    pub fn resolve(&self, page: Option<i64>, limit: Option<i64>) -> DomainResult<PageRequest> {
        let page = match page {
            None => 1,
            Some(p) if p >= 1 => p as u64,
            Some(p) => {
                return Err(DomainError::Validation(format!(
                    "page must be a positive integer, got {}",
                    p
                )))
            }
        };

        let limit = match limit {
            None => self.default_limit,
            Some(l) if l < 1 => {
                return Err(DomainError::Validation(format!(
                    "limit must be a positive integer, got {}",
                    l
                )))
            }
            Some(l) if l as u64 > self.max_limit => {
                return Err(DomainError::Validation(format!(
                    "limit must not exceed {}, got {}",
                    self.max_limit, l
                )))
            }
            Some(l) => l as u64,
        };

        // The offset must stay representable as an SQL OFFSET (i64).
        let offset_fits = (page - 1)
            .checked_mul(limit)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !offset_fits {
            return Err(DomainError::Validation(format!(
                "page {} is out of range for limit {}",
                page, limit
            )));
        }

        Ok(PageRequest { page, limit })
    }

    /// Resolve the request and derive the window for `total_item_count` rows.
    pub fn compute_window(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
        total_item_count: u64,
    ) -> DomainResult<PageWindow> {
        Ok(self.resolve(page, limit)?.window(total_item_count))
    }
}

/// A validated page request. Only obtainable through [`PaginationPolicy::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Cannot overflow: `resolve` rejects pages whose offset exceeds `i64::MAX`.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Derive the page summary. Pages past the end still produce a window;
    /// the store simply returns no rows for it.
    pub fn window(&self, total_item_count: u64) -> PageWindow {
        let page_count = total_item_count.div_ceil(self.limit);
        PageWindow {
            offset: self.offset(),
            limit: self.limit,
            page: self.page,
            page_count,
            has_next_page: self.page < page_count,
            has_previous_page: self.page > 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub page: u64,
    pub page_count: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of items plus its summary. Built per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_item_count: u64,
    pub page: u64,
    pub limit: u64,
    pub page_count: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_item_count: u64, window: PageWindow) -> Self {
        Self {
            items,
            total_item_count,
            page: window.page,
            limit: window.limit,
            page_count: window.page_count,
            has_next_page: window.has_next_page,
            has_previous_page: window.has_previous_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total_item_count: self.total_item_count,
            page: self.page,
            limit: self.limit,
            page_count: self.page_count,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PaginationPolicy {
        PaginationPolicy::new(10, 50)
    }

    #[test]
    fn first_of_three_pages() {
        let w = policy().compute_window(Some(1), Some(10), 25).unwrap();
        assert_eq!(w.page_count, 3);
        assert!(w.has_next_page);
        assert!(!w.has_previous_page);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn last_of_three_pages() {
        let w = policy().compute_window(Some(3), Some(10), 25).unwrap();
        assert_eq!(w.page_count, 3);
        assert!(!w.has_next_page);
        assert!(w.has_previous_page);
        assert_eq!(w.offset, 20);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let w = policy().compute_window(Some(1), Some(10), 0).unwrap();
        assert_eq!(w.page_count, 0);
        assert!(!w.has_next_page);
        assert!(!w.has_previous_page);
    }

    #[test]
    fn defaults_apply_when_omitted() {
        let req = policy().resolve(None, None).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn page_overrun_is_not_an_error() {
        let w = policy().compute_window(Some(7), Some(10), 25).unwrap();
        assert_eq!(w.page, 7);
        assert_eq!(w.offset, 60);
        assert_eq!(w.page_count, 3);
        assert!(!w.has_next_page);
        assert!(w.has_previous_page);
    }

    #[test]
    fn zero_and_negative_values_are_rejected() {
        for (page, limit) in [(Some(0), None), (Some(-3), None), (None, Some(0)), (None, Some(-1))] {
            let err = policy().resolve(page, limit).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{page:?} {limit:?}");
        }
    }

    #[test]
    fn limit_above_max_is_rejected_not_clamped() {
        assert!(matches!(
            policy().resolve(None, Some(51)),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(policy().resolve(None, Some(50)).unwrap().limit(), 50);
    }

    #[test]
    fn page_whose_offset_overflows_is_rejected() {
        let err = PaginationPolicy::default()
            .compute_window(Some(i64::MAX), Some(10), 25)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // would wrap to offset 0 without the check
        assert!(matches!(
            policy().resolve(Some(1_152_921_504_606_846_977), Some(16)),
            Err(DomainError::Validation(_))
        ));

        let last = (i64::MAX / 10) + 1;
        let w = PaginationPolicy::default()
            .compute_window(Some(last), Some(10), 25)
            .unwrap();
        assert_eq!(w.offset, (last as u64 - 1) * 10);
        assert!(!w.has_next_page);
    }

    #[test]
    fn page_count_is_ceiling_of_total_over_limit() {
        for limit in 1..=12i64 {
            for total in 0..=40u64 {
                let w = policy().compute_window(Some(1), Some(limit), total).unwrap();
                let expected = (total + limit as u64 - 1) / limit as u64;
                assert_eq!(w.page_count, expected);
                assert_eq!(w.page_count == 0, total == 0);
            }
        }
    }

    #[test]
    fn navigation_flags_follow_page_position() {
        for page in 1..=6i64 {
            let w = policy().compute_window(Some(page), Some(5), 22).unwrap();
            assert_eq!(w.offset, (page as u64 - 1) * 5);
            assert_eq!(w.has_next_page, (page as u64) < w.page_count);
            assert_eq!(w.has_previous_page, page > 1);
        }
    }

    #[test]
    fn result_carries_window_summary() {
        let w = policy().compute_window(Some(2), Some(2), 5).unwrap();
        let result = PaginatedResult::new(vec!["c", "d"], 5, w).map(str::to_uppercase);
        assert_eq!(result.items, vec!["C".to_string(), "D".to_string()]);
        assert_eq!(result.page_count, 3);
        assert_eq!(result.total_item_count, 5);
        assert!(result.has_next_page && result.has_previous_page);
    }
}
