//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use study_core::{IndexError, ValidationError};

/// Failure to reach or get a usable answer from the persistence layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

/// Errors emitted by dashboard commands and backends.
///
/// None of these are fatal; the caller can retry the action.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("weekly tracking is disabled")]
    WeeklyDisabled,
}

impl ServiceError {
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }
}

impl From<study_core::Error> for ServiceError {
    fn from(err: study_core::Error) -> Self {
        match err {
            study_core::Error::Validation(e) => ServiceError::Validation(e),
            study_core::Error::Index(e) => ServiceError::Index(e),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Transport(TransportError::Storage(err))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(TransportError::Http(err))
    }
}

impl From<SqliteInitError> for ServiceError {
    fn from(err: SqliteInitError) -> Self {
        ServiceError::Transport(TransportError::Sqlite(err))
    }
}
