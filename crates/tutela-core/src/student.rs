//! Student — identified for business purposes by an immutable control number.
//!
//! The UUID is the storage key; the control number is the external,
//! human-assigned identifier that upserts are keyed on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
  pub student_id:       Uuid,
  /// Unique external identifier; never rewritten once assigned.
  pub control_number:   String,
  pub given_name:       String,
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub program_id:       Option<Uuid>,
  pub current_semester: u32,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::registrar::Registrar::upsert_student`]: the control
/// number plus every mutable field. On update the id and control number of
/// the existing row are preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
  pub control_number:   String,
  pub given_name:       String,
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub program_id:       Option<Uuid>,
  pub current_semester: u32,
}
