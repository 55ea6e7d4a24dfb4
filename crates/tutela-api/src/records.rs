//! Handlers for `/records` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/records` | Optional `?status=approved\|failed\|withdrawn\|in_progress` |
//! | `GET`  | `/records/reconciliation` | Unconfirmed withdrawals |
//! | `GET`  | `/records/:id` | Raw record, 404 if not found |
//! | `POST` | `/records/:id/withdraw` | Body: [`WithdrawBody`]; 409 if already withdrawn |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use tutela_core::{
  record::{EnrollmentRecord, RecordOverview, RecordStatus},
  registrar::Registrar,
  store::{RecordFilter, RecordStore},
};
use uuid::Uuid;

use crate::{error::ApiError, risk::FactorAttachment};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<RecordStatus>,
}

/// `GET /records[?status=<status>]` — joined overview rows, newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecordOverview>>, ApiError>
where
  S: RecordStore,
{
  let filter = RecordFilter { status: params.status };
  let overviews = store
    .list_records(&filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(overviews))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /records/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentRecord>, ApiError>
where
  S: RecordStore,
{
  let record = store
    .get_record(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("record {id} not found")))?;
  Ok(Json(record))
}

// ─── Withdraw ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WithdrawBody {
  pub category_id: Uuid,
  pub notes:       Option<String>,
}

/// `POST /records/:id/withdraw` — body: `{"category_id":"...", "notes":"..."}`
pub async fn withdraw<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<WithdrawBody>,
) -> Result<Json<FactorAttachment>, ApiError>
where
  S: RecordStore,
{
  let registrar = Registrar::new(&*store);
  let (factor, association) = registrar
    .withdraw(id, body.category_id, body.notes)
    .await?;
  Ok(Json(FactorAttachment { factor, association }))
}

// ─── Reconciliation ───────────────────────────────────────────────────────────

/// `GET /records/reconciliation` — records carrying a high-severity
/// association without the withdrawn status. Review queue only; nothing is
/// repaired automatically.
pub async fn reconciliation<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RecordOverview>>, ApiError>
where
  S: RecordStore,
{
  let overviews = store
    .list_unconfirmed_withdrawals()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(overviews))
}
