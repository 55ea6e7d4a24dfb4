//! Error type for `tutela-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A uniqueness or foreign-key rule was violated, e.g. a duplicate
  /// student control number or a reference to a missing row.
  #[error("constraint violation: {0}")]
  Constraint(String),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown record status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown severity: {0:?}")]
  UnknownSeverity(String),

  #[error("program not found: {0}")]
  ProgramNotFound(Uuid),

  #[error("subject not found: {0}")]
  SubjectNotFound(Uuid),

  #[error("student not found: {0}")]
  StudentNotFound(Uuid),

  #[error("enrollment record not found: {0}")]
  RecordNotFound(Uuid),

  #[error("risk category not found: {0}")]
  CategoryNotFound(Uuid),
}

/// Promote SQLite constraint failures to [`Error::Constraint`] so callers can
/// tell a duplicate business key or broken reference apart from an I/O fault.
impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, ref message)) = err
      && code.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Self::Constraint(message.clone().unwrap_or_else(|| code.to_string()));
    }
    Self::Database(err)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
