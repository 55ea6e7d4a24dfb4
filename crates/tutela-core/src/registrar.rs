//! The registrar — the application service owning enrollment semantics.
//!
//! Presentation layers (HTTP API, CLI) call these operations and hold no
//! business rules of their own. Each operation awaits its gateway calls
//! strictly in order; there is no retry, locking, or compensating rollback.

use uuid::Uuid;

use crate::{
  error::{Error, Result},
  grades::{self, UnitGrades},
  record::{EnrollmentRecord, NewRecord, RecordStatus},
  risk::{NewAssociation, NewFactor, RiskAssociation, RiskFactor, Severity},
  store::RecordStore,
  student::{Student, StudentProfile},
};

/// Notes recorded on a withdrawal when the caller supplies none.
pub const DEFAULT_WITHDRAWAL_NOTES: &str = "Student withdrawal";

/// Application service over a [`RecordStore`].
pub struct Registrar<'s, S> {
  store: &'s S,
}

impl<'s, S: RecordStore> Registrar<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  // ── Students ──────────────────────────────────────────────────────────

  /// Find a student by control number and update the mutable fields in
  /// place, or create one. The control number is never rewritten, so two
  /// upserts under the same number can never yield two students.
  pub async fn upsert_student(&self, profile: &StudentProfile) -> Result<Student> {
    let existing = self
      .store
      .find_student(&profile.control_number)
      .await
      .map_err(Error::store)?;

    match existing {
      Some(student) => self
        .store
        .update_student(student.student_id, profile)
        .await
        .map_err(Error::store),
      None => self.store.insert_student(profile).await.map_err(Error::store),
    }
  }

  // ── Submission ────────────────────────────────────────────────────────

  /// Compute the final grade and status and insert a brand-new record.
  ///
  /// Resubmitting the same student/subject/semester inserts another row;
  /// records are never merged or updated through this path.
  pub async fn submit_enrollment(
    &self,
    student_id: Uuid,
    subject_id: Uuid,
    semester: u32,
    grades: UnitGrades,
    attendance: Option<f64>,
  ) -> Result<EnrollmentRecord> {
    let final_grade = grades::final_grade(&grades);
    let status = grades::classify(final_grade);

    self
      .store
      .insert_record(NewRecord {
        student_id,
        subject_id,
        semester,
        grades,
        final_grade: Some(final_grade),
        attendance,
        status,
      })
      .await
      .map_err(Error::store)
  }

  // ── Risk factors ──────────────────────────────────────────────────────

  /// Attach a risk factor for `category_id` to a record with the given
  /// severity. The category's factor is created on first use and reused
  /// afterwards.
  pub async fn attach_risk(
    &self,
    record_id: Uuid,
    category_id: Uuid,
    severity: Severity,
    notes: Option<String>,
  ) -> Result<(RiskFactor, RiskAssociation)> {
    self
      .store
      .get_record(record_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::RecordNotFound(record_id))?;

    let factor = self.resolve_factor(category_id).await?;

    let association = self
      .store
      .add_association(NewAssociation {
        record_id,
        factor_id: factor.factor_id,
        severity,
        notes,
      })
      .await
      .map_err(Error::store)?;

    Ok((factor, association))
  }

  /// Withdraw a record: attach a high-severity risk factor for
  /// `category_id`, then flip the status to [`RecordStatus::Withdrawn`].
  ///
  /// Rejected when the record is already withdrawn. The gateway writes run
  /// in order with no rollback: if the status update fails, the new
  /// association remains and the record shows up in
  /// [`RecordStore::list_unconfirmed_withdrawals`] until withdrawn.
  pub async fn withdraw(
    &self,
    record_id: Uuid,
    category_id: Uuid,
    notes: Option<String>,
  ) -> Result<(RiskFactor, RiskAssociation)> {
    let record = self
      .store
      .get_record(record_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::RecordNotFound(record_id))?;

    if record.status.is_withdrawn() {
      return Err(Error::AlreadyWithdrawn(record_id));
    }

    let factor = self.resolve_factor(category_id).await?;

    let notes = notes
      .filter(|n| !n.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_WITHDRAWAL_NOTES.to_owned());

    let association = self
      .store
      .add_association(NewAssociation {
        record_id,
        factor_id: factor.factor_id,
        severity: Severity::High,
        notes: Some(notes),
      })
      .await
      .map_err(Error::store)?;

    self
      .store
      .set_record_status(record_id, RecordStatus::Withdrawn)
      .await
      .map_err(Error::store)?;

    Ok((factor, association))
  }

  /// Look up the factor for a category, creating one named after the
  /// category if none exists yet.
  async fn resolve_factor(&self, category_id: Uuid) -> Result<RiskFactor> {
    if let Some(factor) = self
      .store
      .find_factor_for_category(category_id)
      .await
      .map_err(Error::store)?
    {
      return Ok(factor);
    }

    let category = self
      .store
      .get_category(category_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CategoryNotFound(category_id))?;

    self
      .store
      .add_factor(NewFactor {
        category_id,
        name: category.name,
        description: category.description,
      })
      .await
      .map_err(Error::store)
  }
}
