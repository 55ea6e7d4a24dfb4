//! Program — an academic major or track. Plain reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
  pub program_id: Uuid,
  pub name:       String,
  /// Optional short code, e.g. "ISC".
  pub code:       Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::add_program`].
/// The id and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
  pub name: String,
  pub code: Option<String>,
}
