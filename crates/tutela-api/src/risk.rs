//! Handlers for the risk taxonomy and per-record associations.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/risk-categories` | All categories, ordered by name |
//! | `POST`   | `/risk-categories` | Body: [`NewCategory`]; returns 201 |
//! | `DELETE` | `/risk-categories/:id` | 204 on success |
//! | `GET`    | `/risk-factors` | Optional `?category_id=<uuid>` |
//! | `GET`    | `/records/:id/risk-factors` | Associations, oldest first |
//! | `POST`   | `/records/:id/risk-factors` | Body: [`AttachBody`]; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tutela_core::{
  registrar::Registrar,
  risk::{NewCategory, RiskAssociation, RiskCategory, RiskFactor, Severity},
  store::RecordStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// Response payload for the two operations that attach a factor to a record
/// (manual attach and withdraw).
#[derive(Debug, Serialize)]
pub struct FactorAttachment {
  pub factor:      RiskFactor,
  pub association: RiskAssociation,
}

// ─── Categories ───────────────────────────────────────────────────────────────

/// `GET /risk-categories`
pub async fn list_categories<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RiskCategory>>, ApiError>
where
  S: RecordStore,
{
  let categories = store
    .list_categories()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(categories))
}

/// `POST /risk-categories`
pub async fn create_category<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCategory>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let category = store
    .add_category(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(category)))
}

/// `DELETE /risk-categories/:id`
pub async fn delete_category<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  store
    .get_category(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("risk category {id} not found")))?;

  store
    .delete_category(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Factors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FactorParams {
  pub category_id: Option<Uuid>,
}

/// `GET /risk-factors[?category_id=<uuid>]`
pub async fn list_factors<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<FactorParams>,
) -> Result<Json<Vec<RiskFactor>>, ApiError>
where
  S: RecordStore,
{
  let factors = store
    .list_factors(params.category_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(factors))
}

// ─── Associations ─────────────────────────────────────────────────────────────

/// `GET /records/:id/risk-factors`
pub async fn list_associations<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<RiskAssociation>>, ApiError>
where
  S: RecordStore,
{
  let associations = store
    .list_associations(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(associations))
}

/// JSON body accepted by `POST /records/:id/risk-factors`.
#[derive(Debug, Deserialize)]
pub struct AttachBody {
  pub category_id: Uuid,
  pub severity:    Severity,
  pub notes:       Option<String>,
}

/// `POST /records/:id/risk-factors` — attach a factor for the category with
/// the given severity. Does not change the record status.
pub async fn attach<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AttachBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let registrar = Registrar::new(&*store);
  let (factor, association) = registrar
    .attach_risk(id, body.category_id, body.severity, body.notes)
    .await?;
  Ok((StatusCode::CREATED, Json(FactorAttachment { factor, association })))
}
