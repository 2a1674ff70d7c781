//! Session and transaction coordination.
//!
//! # Responsibility
//! - Own the store connection for one logical session.
//! - Run units of work atomically, flattening nested calls into the
//!   outermost transaction.
//! - Classify store errors into the coarse kinds callers may inspect.
//!
//! # Invariants
//! - At most one transaction is active per session.
//! - Only the outermost unit of work begins, commits or rolls back.
//! - A failed nested unit of work forces the outermost one to roll back.

use crate::db::DbError;
use crate::model::{RecordId, ValidationError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod transaction;

pub use transaction::SessionService;

pub type StoreResult<T> = Result<T, StoreError>;

/// Coarse classification of write failures.
///
/// Callers that only need "worked / did not work" can ignore this and use
/// `Result::ok` or `Result::is_ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Uniqueness, foreign key, check or field validation failure.
    ConstraintViolation,
    /// Connectivity, I/O or any other operational failure of the store.
    StoreFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConstraintViolation => "constraint_violation",
            Self::StoreFailure => "store_failure",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by units of work and record store writes.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Entity failed field validation before reaching the store.
    Validation(ValidationError),
    /// Entity has no store identity but the operation needs one.
    Unpersisted { table: &'static str },
    /// Entity identity no longer matches a stored row.
    MissingRecord { table: &'static str, id: RecordId },
    /// Outer work completed, but a nested unit of work had failed.
    RolledBack(ErrorKind),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(inner, _)))
                if inner.code == ErrorCode::ConstraintViolation =>
            {
                ErrorKind::ConstraintViolation
            }
            Self::Db(_) => ErrorKind::StoreFailure,
            Self::Validation(_) | Self::Unpersisted { .. } => ErrorKind::ConstraintViolation,
            Self::MissingRecord { .. } => ErrorKind::StoreFailure,
            Self::RolledBack(kind) => *kind,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Unpersisted { table } => write!(f, "{table} record has no identity yet"),
            Self::MissingRecord { table, id } => write!(f, "{table} record {id} not found"),
            Self::RolledBack(kind) => {
                write!(f, "transaction rolled back after nested {kind} failure")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Unpersisted { .. } | Self::MissingRecord { .. } | Self::RolledBack(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
