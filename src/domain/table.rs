//! Client-side sorted and paged table

use crate::domain::pagination::{info_of, window_of, Page, PageInfo, PaginationState};
use crate::domain::sort::{sort_rows, SortOrder, SortProperty};
use crate::error::ValidationError;

/// Rows kept in sort order with a current page
///
/// Changing the sort order or the rows sends the table back to page 1.
#[derive(Debug, Clone)]
pub struct ItemsTable<T, P> {
    rows: Vec<T>,
    sort: SortOrder<P>,
    tie_break: SortOrder<P>,
    pagination: PaginationState,
}

impl<T, P> ItemsTable<T, P>
where
    P: SortProperty<T>,
{
    pub fn new(
        rows: Vec<T>,
        sort: SortOrder<P>,
        tie_break: SortOrder<P>,
        page_size: usize,
    ) -> Result<Self, ValidationError> {
        let mut table = Self {
            rows,
            sort,
            tie_break,
            pagination: PaginationState::new(page_size)?,
        };
        table.resort();
        Ok(table)
    }

    pub fn sort(&self) -> &SortOrder<P> {
        &self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder<P>) {
        self.sort = sort;
        self.resort();
        self.pagination.reset();
    }

    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.resort();
        self.pagination.reset();
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), ValidationError> {
        self.pagination.set_page(page)
    }

    pub fn page(&self) -> Page {
        self.pagination.current()
    }

    /// All rows in sort order
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn page_rows(&self) -> &[T] {
        window_of(&self.rows, self.pagination.current())
    }

    pub fn page_info(&self) -> PageInfo {
        info_of(self.rows.len(), self.pagination.current())
    }

    fn resort(&mut self) {
        sort_rows(&mut self.rows, &self.sort, &self.tie_break);
    }
}
