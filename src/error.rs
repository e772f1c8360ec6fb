//! Error taxonomy shared by the filter compiler, repositories and search

use thiserror::Error;

use crate::domain::filter::{Entity, Operator};

/// Backend query failure. Never treated as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataAccessError {
    #[error("archive request failed: {0}")]
    Transport(String),

    #[error("archive returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("archive rejected query: {}", messages.join("; "))]
    Backend { messages: Vec<String> },

    #[error("malformed archive response: {0}")]
    MalformedResponse(String),
}

/// Malformed user input, reported inline without touching the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("page must be at least 1")]
    InvalidPage,

    #[error("page size must be at least 1")]
    InvalidPageSize,

    #[error("{entity} lists cannot be ordered by `{order}`")]
    UnsupportedOrder { entity: Entity, order: String },
}

/// A filter that does not fit the entity vocabulary. Programmer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{entity} does not support `{field}_{operator}`")]
    UnsupportedPredicate {
        entity: Entity,
        field: String,
        operator: Operator,
    },

    #[error("`{field}_{operator}` on {entity} expects a {expected} value")]
    MismatchedValue {
        entity: Entity,
        field: String,
        operator: Operator,
        expected: &'static str,
    },

    #[error("{entity} has no relation `{relation}`")]
    UnknownRelation { entity: Entity, relation: String },
}

/// Error of every repository call
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl QueryError {
    /// Whether this failure belongs in a resource's error slot
    pub fn is_data_access(&self) -> bool {
        matches!(self, QueryError::DataAccess(_))
    }
}
