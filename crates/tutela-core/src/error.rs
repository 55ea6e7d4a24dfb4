//! Error types for `tutela-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("enrollment record not found: {0}")]
  RecordNotFound(Uuid),

  #[error("risk category not found: {0}")]
  CategoryNotFound(Uuid),

  #[error("record {0} is already withdrawn")]
  AlreadyWithdrawn(Uuid),

  /// A failure surfaced from the persistence gateway, propagated verbatim.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a gateway failure for propagation to the caller.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
