//! Handlers for `/students` endpoints.
//!
//! Students are created and updated only through `/enrollments` (the upsert
//! path); these endpoints are read-only.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/students` | All students, ordered by surname |
//! | `GET`  | `/students/lookup` | `?control_number=<n>` exact match |
//! | `GET`  | `/students/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use tutela_core::{store::RecordStore, student::Student};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /students`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Student>>, ApiError>
where
  S: RecordStore,
{
  let students = store
    .list_students()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(students))
}

/// `GET /students/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError>
where
  S: RecordStore,
{
  let student = store
    .get_student(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(student))
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
  pub control_number: String,
}

/// `GET /students/lookup?control_number=<n>`
pub async fn lookup<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<LookupParams>,
) -> Result<Json<Student>, ApiError>
where
  S: RecordStore,
{
  let student = store
    .find_student(&params.control_number)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "no student with control number {:?}",
        params.control_number
      ))
    })?;
  Ok(Json(student))
}
