//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tutela-store-sqlite`).
//! Higher layers (`tutela-api`, the registrar service) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  program::{NewProgram, Program},
  record::{EnrollmentRecord, NewRecord, RecordOverview, RecordStatus},
  risk::{NewAssociation, NewCategory, NewFactor, RiskAssociation, RiskCategory, RiskFactor},
  student::{Student, StudentProfile},
  subject::{NewSubject, Subject},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`RecordStore::list_records`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter {
  /// Restrict to records in a specific status.
  pub status: Option<RecordStatus>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a tutela storage backend — the persistence gateway.
///
/// Methods are small, independent read/write calls; orchestration across
/// several of them (upsert, submission, withdrawal) lives in
/// [`crate::registrar::Registrar`], which awaits them strictly in order.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Programs ──────────────────────────────────────────────────────────

  fn add_program(
    &self,
    input: NewProgram,
  ) -> impl Future<Output = Result<Program, Self::Error>> + Send + '_;

  /// Retrieve a program by id. Returns `None` if not found.
  fn get_program(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Program>, Self::Error>> + Send + '_;

  /// List all programs, ordered by name.
  fn list_programs(
    &self,
  ) -> impl Future<Output = Result<Vec<Program>, Self::Error>> + Send + '_;

  /// Delete a program. Errors if the id is absent or still referenced.
  fn delete_program(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  fn add_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  fn get_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// List subjects, optionally restricted to one program, ordered by name.
  fn list_subjects(
    &self,
    program: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  fn delete_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  /// Create and persist a new student. Fails with a constraint error when
  /// the control number is already taken.
  fn insert_student<'a>(
    &'a self,
    profile: &'a StudentProfile,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + 'a;

  /// Update the mutable fields of an existing student in place, preserving
  /// id and control number. Errors if the id is absent.
  fn update_student<'a>(
    &'a self,
    id: Uuid,
    profile: &'a StudentProfile,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + 'a;

  /// Look up a student by control number (exact match).
  fn find_student<'a>(
    &'a self,
    control_number: &'a str,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + 'a;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// List all students, ordered by paternal surname.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  // ── Enrollment records ────────────────────────────────────────────────

  /// Persist a new enrollment record. Always inserts; there is no merge
  /// path for an existing student/subject/semester combination.
  fn insert_record(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<EnrollmentRecord, Self::Error>> + Send + '_;

  fn get_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<EnrollmentRecord>, Self::Error>> + Send + '_;

  /// Overwrite a record's status field. Errors if the id is absent.
  fn set_record_status(
    &self,
    id: Uuid,
    status: RecordStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The joined list view: records with student/subject display fields and
  /// association counts, newest first.
  fn list_records<'a>(
    &'a self,
    filter: &'a RecordFilter,
  ) -> impl Future<Output = Result<Vec<RecordOverview>, Self::Error>> + Send + 'a;

  /// Reconciliation read: records NOT in withdrawn status that carry at
  /// least one high-severity association — candidates for a withdrawal whose
  /// final status write never landed. Surfaced for review, never auto-fixed.
  fn list_unconfirmed_withdrawals(
    &self,
  ) -> impl Future<Output = Result<Vec<RecordOverview>, Self::Error>> + Send + '_;

  // ── Risk reference data ───────────────────────────────────────────────

  fn add_category(
    &self,
    input: NewCategory,
  ) -> impl Future<Output = Result<RiskCategory, Self::Error>> + Send + '_;

  fn get_category(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<RiskCategory>, Self::Error>> + Send + '_;

  /// List all categories, ordered by name.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<RiskCategory>, Self::Error>> + Send + '_;

  fn delete_category(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The factor used for a category's withdrawals, if one has been created.
  /// At most one result is expected; ties break on creation time.
  fn find_factor_for_category(
    &self,
    category: Uuid,
  ) -> impl Future<Output = Result<Option<RiskFactor>, Self::Error>> + Send + '_;

  fn add_factor(
    &self,
    input: NewFactor,
  ) -> impl Future<Output = Result<RiskFactor, Self::Error>> + Send + '_;

  /// List factors, optionally restricted to one category.
  fn list_factors(
    &self,
    category: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<RiskFactor>, Self::Error>> + Send + '_;

  // ── Associations ──────────────────────────────────────────────────────

  fn add_association(
    &self,
    input: NewAssociation,
  ) -> impl Future<Output = Result<RiskAssociation, Self::Error>> + Send + '_;

  /// All associations attached to one record, oldest first.
  fn list_associations(
    &self,
    record: Uuid,
  ) -> impl Future<Output = Result<Vec<RiskAssociation>, Self::Error>> + Send + '_;

  /// Number of associations attached to one record; 0 for none.
  fn count_associations(
    &self,
    record: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
