//! Archive infrastructure - GraphQL query execution and entity repositories

mod executor;
mod repository;
mod types;

pub use executor::{HttpQueryExecutor, QueryExecutor};
pub use repository::{Archive, Repository};
pub use types::{ArchiveEntity, Block, BlockRef, Call, CallRef, Event, Extrinsic, ExtrinsicRef};
