//! Screen-level operations
//!
//! - detail: extrinsic detail with its events and calls
//! - export: CSV and JSON export of listed rows

pub mod detail;
pub mod export;

pub use detail::{load_extrinsic_detail, ExtrinsicDetail};
