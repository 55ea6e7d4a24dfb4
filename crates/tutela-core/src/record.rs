//! Enrollment records — one student's attempt at one subject in one semester.
//!
//! Submission is insert-only: resubmitting the same student/subject/semester
//! creates another row rather than merging into an existing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grades::UnitGrades;

/// Outcome status of an enrollment record.
///
/// `Approved`/`Failed` are derived from the final grade at submission;
/// `Withdrawn` is set only by the withdraw operation. There is no transition
/// back out of `Withdrawn`. `InProgress` is reachable by the data model but
/// no write path here produces it; externally-seeded rows may carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
  InProgress,
  Approved,
  Failed,
  Withdrawn,
}

impl RecordStatus {
  pub fn is_withdrawn(&self) -> bool { matches!(self, Self::Withdrawn) }
}

impl std::fmt::Display for RecordStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::InProgress => "in_progress",
      Self::Approved => "approved",
      Self::Failed => "failed",
      Self::Withdrawn => "withdrawn",
    };
    f.write_str(s)
  }
}

/// A persisted enrollment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
  pub record_id:   Uuid,
  pub student_id:  Uuid,
  pub subject_id:  Uuid,
  /// The semester in which the subject was taken (not the student's current
  /// semester).
  pub semester:    u32,
  pub grades:      UnitGrades,
  /// Mean of the unit grades, fixed at submission time and never recomputed.
  pub final_grade: Option<f64>,
  pub attendance:  Option<f64>,
  pub status:      RecordStatus,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::insert_record`]. The final grade and
/// status are computed by the registrar before the row is written; the store
/// assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewRecord {
  pub student_id:  Uuid,
  pub subject_id:  Uuid,
  pub semester:    u32,
  pub grades:      UnitGrades,
  pub final_grade: Option<f64>,
  pub attendance:  Option<f64>,
  pub status:      RecordStatus,
}

/// Joined read model for the record list — never stored, always derived.
///
/// Carries the student and subject display fields plus the number of risk
/// factor associations attached to the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOverview {
  pub record_id:        Uuid,
  pub control_number:   String,
  pub given_name:       String,
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub subject_name:     String,
  pub semester:         u32,
  pub final_grade:      Option<f64>,
  pub status:           RecordStatus,
  pub risk_count:       u64,
  pub created_at:       DateTime<Utc>,
}
