//! Handlers for `/programs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/programs` | All programs, ordered by name |
//! | `POST`   | `/programs` | Body: [`NewProgram`]; returns 201 |
//! | `GET`    | `/programs/:id` | 404 if not found |
//! | `DELETE` | `/programs/:id` | 204 on success |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use tutela_core::{
  program::{NewProgram, Program},
  store::RecordStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /programs`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Program>>, ApiError>
where
  S: RecordStore,
{
  let programs = store
    .list_programs()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(programs))
}

/// `POST /programs` — body: `{"name":"...", "code":"..."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewProgram>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let program = store
    .add_program(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(program)))
}

/// `GET /programs/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Program>, ApiError>
where
  S: RecordStore,
{
  let program = store
    .get_program(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("program {id} not found")))?;
  Ok(Json(program))
}

/// `DELETE /programs/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  store
    .get_program(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("program {id} not found")))?;

  store
    .delete_program(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
