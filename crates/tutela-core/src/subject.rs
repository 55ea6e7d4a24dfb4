//! Subject — a course, optionally tied to a program and nominal semester.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub subject_id: Uuid,
  pub name:       String,
  pub code:       Option<String>,
  /// The semester in which the subject is nominally offered.
  pub semester:   u32,
  pub program_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::add_subject`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
  pub name:       String,
  pub code:       Option<String>,
  pub semester:   u32,
  pub program_id: Option<Uuid>,
}
