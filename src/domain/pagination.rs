//! Page windows and page metadata

use serde::Serialize;

use crate::error::ValidationError;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    page: usize,
    page_size: usize,
}

impl Page {
    pub fn new(page: usize, page_size: usize) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }
        if page_size == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(Self { page, page_size })
    }

    pub fn first(page_size: usize) -> Result<Self, ValidationError> {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first row on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// One past the last row on this page
    pub fn end(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub has_next_page: bool,
    pub total_page_count: usize,
}

pub fn info_of(total_count: usize, page: Page) -> PageInfo {
    PageInfo {
        page: page.page,
        page_size: page.page_size,
        has_next_page: page.end() < total_count,
        total_page_count: total_count.div_ceil(page.page_size),
    }
}

/// Rows of `items` on `page`; empty when the page is past the end
pub fn window_of<T>(items: &[T], page: Page) -> &[T] {
    let start = page.offset().min(items.len());
    let end = page.end().min(items.len());
    &items[start..end]
}

/// One page of rows together with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

/// Current page of a table; sort and filter changes send it back to page 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationState {
    current: Page,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Result<Self, ValidationError> {
        Ok(Self {
            current: Page::first(page_size)?,
        })
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), ValidationError> {
        self.current = Page::new(page, self.current.page_size)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current.page = 1;
    }
}
