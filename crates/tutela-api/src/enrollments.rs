//! Handler for `POST /enrollments` — the grade submission path.
//!
//! One request carries the student profile and the subject attempt. The
//! registrar upserts the student by control number, computes the final grade
//! and status, and inserts a brand-new record (resubmission never merges).

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tutela_core::{
  grades::UnitGrades,
  record::EnrollmentRecord,
  registrar::Registrar,
  store::RecordStore,
  student::{Student, StudentProfile},
};
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body accepted by `POST /enrollments`.
#[derive(Debug, Deserialize)]
pub struct SubmissionBody {
  pub student:    StudentProfile,
  pub subject_id: Uuid,
  /// The semester the subject was taken in.
  pub semester:   u32,
  #[serde(default)]
  pub grades:     UnitGrades,
  pub attendance: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
  pub student: Student,
  pub record:  EnrollmentRecord,
}

/// `POST /enrollments` — returns 201 + the upserted student and new record.
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<SubmissionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  if body.student.control_number.trim().is_empty() {
    return Err(ApiError::BadRequest("control_number must not be empty".into()));
  }

  let registrar = Registrar::new(&*store);

  let student = registrar.upsert_student(&body.student).await?;
  let record = registrar
    .submit_enrollment(
      student.student_id,
      body.subject_id,
      body.semester,
      body.grades,
      body.attendance,
    )
    .await?;

  Ok((StatusCode::CREATED, Json(SubmissionResponse { student, record })))
}
