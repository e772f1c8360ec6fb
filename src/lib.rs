//! Calamar: search and browse Substrate archive data
//!
//! - `domain`: filters, search resolution, sorting, paging, async resources
//! - `infrastructure`: archive query execution and address codecs
//! - `modules`: extrinsic detail and export

pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod modules;

pub use crate::core::NavigationTarget;
pub use crate::error::{DataAccessError, FilterError, QueryError, ValidationError};
