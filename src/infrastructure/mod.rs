//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The archive query boundary (GraphQL over HTTP) and entity repositories
//! - The address codec boundary

pub mod address;
pub mod archive;

pub use address::{AddressCodec, HexAddressCodec};
pub use archive::{Archive, HttpQueryExecutor, QueryExecutor};
