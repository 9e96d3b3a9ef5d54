//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountServiceError {
    #[error("an account with this name already exists")]
    DuplicateAccount,
    /// Deliberately silent about whether the name or the password was wrong.
    #[error("invalid name or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `GradeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradeServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
