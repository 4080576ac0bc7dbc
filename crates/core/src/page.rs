//! Pagination request/response types.

use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::validate::Violations;

pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated paging window. `page_number` is 1-based.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> DomainResult<Self> {
        let mut rules = Violations::new();
        rules.require(page_number >= 1, "page_number must be at least 1");
        rules.require(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
        );
        rules.finish()?;
        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> usize {
        ((self.page_number - 1) as usize) * (self.page_size as usize)
    }
}

/// One page of results plus the total match count ignoring paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total_count,
            page_number: request.page_number(),
            page_size: request.page_size(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_page_number_and_oversized_page_together() {
        let err = PageRequest::new(0, 500).unwrap_err();
        match err {
            crate::DomainError::Validation(rules) => assert_eq!(rules.len(), 2),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn page_echoes_request() {
        let req = PageRequest::new(2, 5).unwrap();
        let page = Page::new(vec![1, 2, 3], 13, &req);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.total_count, 13);
    }
}
