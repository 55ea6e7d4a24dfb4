//! JSON REST API for tutela.
//!
//! Exposes an axum [`Router`] backed by any [`tutela_core::store::RecordStore`].
//! Business rules live in [`tutela_core::registrar::Registrar`]; handlers only
//! translate between HTTP and the service. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tutela_api::api_router(store.clone()))
//! ```

pub mod enrollments;
pub mod error;
pub mod programs;
pub mod records;
pub mod risk;
pub mod students;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use tutela_core::store::RecordStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Reference data
    .route("/programs", get(programs::list::<S>).post(programs::create::<S>))
    .route(
      "/programs/{id}",
      get(programs::get_one::<S>).delete(programs::delete_one::<S>),
    )
    .route("/subjects", get(subjects::list::<S>).post(subjects::create::<S>))
    .route(
      "/subjects/{id}",
      get(subjects::get_one::<S>).delete(subjects::delete_one::<S>),
    )
    // Students (read-only; writes go through /enrollments)
    .route("/students", get(students::list::<S>))
    .route("/students/lookup", get(students::lookup::<S>))
    .route("/students/{id}", get(students::get_one::<S>))
    // Submission
    .route("/enrollments", post(enrollments::submit::<S>))
    // Records
    .route("/records", get(records::list::<S>))
    .route("/records/reconciliation", get(records::reconciliation::<S>))
    .route("/records/{id}", get(records::get_one::<S>))
    .route("/records/{id}/withdraw", post(records::withdraw::<S>))
    .route(
      "/records/{id}/risk-factors",
      get(risk::list_associations::<S>).post(risk::attach::<S>),
    )
    // Risk taxonomy
    .route(
      "/risk-categories",
      get(risk::list_categories::<S>).post(risk::create_category::<S>),
    )
    .route("/risk-categories/{id}", delete(risk::delete_category::<S>))
    .route("/risk-factors", get(risk::list_factors::<S>))
    .with_state(store)
}
