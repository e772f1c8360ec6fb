//! Async value lifecycle shared by every list and detail view

use crate::error::{DataAccessError, QueryError};

/// Loading, failed, or settled with optional data
///
/// Not-found is the settled state without data; it is derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Failed(DataAccessError),
    Ready(Option<T>),
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Resource::Loading
    }
}

impl<T> Resource<T> {
    /// Settle from a fetch outcome
    ///
    /// Data access failures land in the error slot; any other error is handed
    /// back to the caller.
    pub fn settle(outcome: Result<Option<T>, QueryError>) -> Result<Self, QueryError> {
        match outcome {
            Ok(data) => Ok(Resource::Ready(data)),
            Err(QueryError::DataAccess(err)) => Ok(Resource::Failed(err)),
            Err(other) => Err(other),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Ready(data) => data.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DataAccessError> {
        match self {
            Resource::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn not_found(&self) -> bool {
        matches!(self, Resource::Ready(None))
    }
}

impl<T> Resource<Vec<T>> {
    /// Rows of a list resource; empty unless settled with data
    pub fn items(&self) -> &[T] {
        self.data().map(Vec::as_slice).unwrap_or(&[])
    }
}
