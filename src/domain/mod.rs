//! Domain layer - query resolution and the generic result-set engine
//!
//! - `filter`: declarative filters compiled into archive clauses
//! - `search`: staged classification of free-text search queries
//! - `sort`, `pagination`, `table`: ordering and paging of result rows
//! - `resource`, `fetcher`: async loading lifecycle of list and detail data

pub mod account;
pub mod balance;
pub mod fetcher;
pub mod filter;
pub mod pagination;
pub mod resource;
pub mod search;
pub mod sort;
pub mod table;

pub use fetcher::{FetchOptions, ResourceFetcher};
pub use filter::{compile, Entity, FilterExpr, FilterValue, Operator, Predicate};
pub use pagination::{info_of, window_of, ItemsPage, Page, PageInfo, PaginationState};
pub use resource::Resource;
pub use search::{SearchResolver, SearchStage};
pub use sort::{SortDirection, SortOrder, SortProperty, SortValue};
pub use table::ItemsTable;
