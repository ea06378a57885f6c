//! Paging primitives shared by the catalog and the ledger

use crate::error::{AppError, AppResult};

/// A page request: zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 20;

impl PageRequest {
    pub fn new(page: i64, size: i64) -> AppResult<Self> {
        if page < 0 {
            return Err(AppError::InvalidArgument(
                "page must not be negative".to_string(),
            ));
        }
        if size <= 0 {
            return Err(AppError::InvalidArgument(
                "size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total element count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_times_size() {
        let request = PageRequest::new(3, 25).unwrap();
        assert_eq!(request.offset(), 75);
    }

    #[test]
    fn rejects_non_positive_size() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, -5).is_err());
        assert!(PageRequest::new(-1, 10).is_err());
    }
}
