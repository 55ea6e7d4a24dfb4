//! Integration tests for `SqliteStore` against an in-memory database,
//! including the registrar flows that orchestrate it.

use tutela_core::{
  grades::UnitGrades,
  program::NewProgram,
  record::RecordStatus,
  registrar::{Registrar, DEFAULT_WITHDRAWAL_NOTES},
  risk::{NewAssociation, NewCategory, Severity},
  store::{RecordFilter, RecordStore},
  student::StudentProfile,
  subject::NewSubject,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn profile(control_number: &str, given_name: &str) -> StudentProfile {
  StudentProfile {
    control_number:   control_number.into(),
    given_name:       given_name.into(),
    paternal_surname: "Lopez".into(),
    maternal_surname: "Garcia".into(),
    program_id:       None,
    current_semester: 3,
  }
}

fn subject(name: &str) -> NewSubject {
  NewSubject {
    name:       name.into(),
    code:       None,
    semester:   3,
    program_id: None,
  }
}

/// A student plus one subject, ready for submissions.
async fn seed_student_and_subject(s: &SqliteStore) -> (Uuid, Uuid) {
  let student = s.insert_student(&profile("20210001", "Ana")).await.unwrap();
  let subject = s.add_subject(subject("Algebra")).await.unwrap();
  (student.student_id, subject.subject_id)
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_program() {
  let s = store().await;

  let program = s
    .add_program(NewProgram { name: "Systems Engineering".into(), code: Some("ISC".into()) })
    .await
    .unwrap();

  let fetched = s.get_program(program.program_id).await.unwrap().unwrap();
  assert_eq!(fetched.program_id, program.program_id);
  assert_eq!(fetched.name, "Systems Engineering");
  assert_eq!(fetched.code.as_deref(), Some("ISC"));
}

#[tokio::test]
async fn list_programs_ordered_by_name() {
  let s = store().await;
  s.add_program(NewProgram { name: "Mechatronics".into(), code: None }).await.unwrap();
  s.add_program(NewProgram { name: "Accounting".into(), code: None }).await.unwrap();

  let programs = s.list_programs().await.unwrap();
  assert_eq!(programs.len(), 2);
  assert_eq!(programs[0].name, "Accounting");
  assert_eq!(programs[1].name, "Mechatronics");
}

#[tokio::test]
async fn delete_missing_program_errors() {
  let s = store().await;
  let err = s.delete_program(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::ProgramNotFound(_)));
}

#[tokio::test]
async fn list_subjects_filtered_by_program() {
  let s = store().await;
  let program = s
    .add_program(NewProgram { name: "Systems Engineering".into(), code: None })
    .await
    .unwrap();

  let mut owned = subject("Data Structures");
  owned.program_id = Some(program.program_id);
  s.add_subject(owned).await.unwrap();
  s.add_subject(subject("General Chemistry")).await.unwrap();

  let all = s.list_subjects(None).await.unwrap();
  assert_eq!(all.len(), 2);

  let filtered = s.list_subjects(Some(program.program_id)).await.unwrap();
  assert_eq!(filtered.len(), 1);
  assert_eq!(filtered[0].name, "Data Structures");
}

#[tokio::test]
async fn delete_subject_roundtrip() {
  let s = store().await;
  let created = s.add_subject(subject("Calculus")).await.unwrap();

  s.delete_subject(created.subject_id).await.unwrap();
  assert!(s.get_subject(created.subject_id).await.unwrap().is_none());

  let err = s.delete_subject(created.subject_id).await.unwrap_err();
  assert!(matches!(err, crate::Error::SubjectNotFound(_)));
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_student_by_control_number() {
  let s = store().await;

  let created = s.insert_student(&profile("20210001", "Ana")).await.unwrap();

  let found = s.find_student("20210001").await.unwrap().unwrap();
  assert_eq!(found.student_id, created.student_id);
  assert_eq!(found.given_name, "Ana");

  assert!(s.find_student("99999999").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_control_number_is_constraint_error() {
  let s = store().await;
  s.insert_student(&profile("20210001", "Ana")).await.unwrap();

  let err = s.insert_student(&profile("20210001", "Benito")).await.unwrap_err();
  assert!(matches!(err, crate::Error::Constraint(_)));
}

#[tokio::test]
async fn upsert_student_updates_in_place() {
  let s = store().await;
  let registrar = Registrar::new(&s);

  let first = registrar.upsert_student(&profile("20210001", "Ana")).await.unwrap();

  let mut changed = profile("20210001", "Ana Maria");
  changed.current_semester = 4;
  let second = registrar.upsert_student(&changed).await.unwrap();

  // Same row, updated fields, control number untouched.
  assert_eq!(second.student_id, first.student_id);
  assert_eq!(second.given_name, "Ana Maria");
  assert_eq!(second.current_semester, 4);
  assert_eq!(second.control_number, "20210001");

  let all = s.list_students().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].given_name, "Ana Maria");
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_enrollment_computes_grade_and_status() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(80.0), Some(70.0), Some(90.0)),
      Some(95.0),
    )
    .await
    .unwrap();

  assert_eq!(record.final_grade, Some(80.0));
  assert_eq!(record.status, RecordStatus::Approved);
  assert_eq!(record.attendance, Some(95.0));

  let fetched = s.get_record(record.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, RecordStatus::Approved);
  assert_eq!(fetched.grades.unit2, Some(70.0));
}

#[tokio::test]
async fn submit_enrollment_below_threshold_fails() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(60.0), Some(70.0), Some(79.9)),
      None,
    )
    .await
    .unwrap();

  assert_eq!(record.final_grade, Some(69.97));
  assert_eq!(record.status, RecordStatus::Failed);
}

#[tokio::test]
async fn missing_units_count_as_zero() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(80.0), None, None),
      None,
    )
    .await
    .unwrap();

  assert_eq!(record.final_grade, Some(26.67));
  assert_eq!(record.status, RecordStatus::Failed);
  assert_eq!(record.grades.unit2, None);
}

#[tokio::test]
async fn resubmission_creates_second_record() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let grades = UnitGrades::new(Some(75.0), Some(75.0), Some(75.0));
  let first = registrar
    .submit_enrollment(student_id, subject_id, 3, grades, None)
    .await
    .unwrap();
  let second = registrar
    .submit_enrollment(student_id, subject_id, 3, grades, None)
    .await
    .unwrap();

  assert_ne!(first.record_id, second.record_id);

  let overviews = s.list_records(&RecordFilter::default()).await.unwrap();
  assert_eq!(overviews.len(), 2);
}

// ─── Withdrawal ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn withdraw_flips_status_and_attaches_high_severity_factor() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(80.0), Some(80.0), Some(80.0)),
      None,
    )
    .await
    .unwrap();

  let category = s
    .add_category(NewCategory {
      name:        "Economic hardship".into(),
      description: Some("Income loss in the household".into()),
    })
    .await
    .unwrap();

  let (factor, association) = registrar
    .withdraw(record.record_id, category.category_id, None)
    .await
    .unwrap();

  // Factor defaults to the category's name and description.
  assert_eq!(factor.category_id, category.category_id);
  assert_eq!(factor.name, "Economic hardship");

  assert_eq!(association.record_id, record.record_id);
  assert_eq!(association.severity, Severity::High);
  assert_eq!(association.notes.as_deref(), Some(DEFAULT_WITHDRAWAL_NOTES));

  let fetched = s.get_record(record.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, RecordStatus::Withdrawn);

  assert_eq!(s.count_associations(record.record_id).await.unwrap(), 1);
}

#[tokio::test]
async fn withdraw_reuses_the_category_factor() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let grades = UnitGrades::new(Some(80.0), Some(80.0), Some(80.0));
  let first = registrar
    .submit_enrollment(student_id, subject_id, 3, grades, None)
    .await
    .unwrap();
  let second = registrar
    .submit_enrollment(student_id, subject_id, 4, grades, None)
    .await
    .unwrap();

  let category = s
    .add_category(NewCategory { name: "Relocation".into(), description: None })
    .await
    .unwrap();

  let (factor_a, _) = registrar
    .withdraw(first.record_id, category.category_id, Some("moved away".into()))
    .await
    .unwrap();
  let (factor_b, _) = registrar
    .withdraw(second.record_id, category.category_id, None)
    .await
    .unwrap();

  assert_eq!(factor_a.factor_id, factor_b.factor_id);
  assert_eq!(s.list_factors(Some(category.category_id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn withdraw_already_withdrawn_is_rejected() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(50.0), Some(50.0), Some(50.0)),
      None,
    )
    .await
    .unwrap();

  let category = s
    .add_category(NewCategory { name: "Health".into(), description: None })
    .await
    .unwrap();

  registrar
    .withdraw(record.record_id, category.category_id, None)
    .await
    .unwrap();

  let err = registrar
    .withdraw(record.record_id, category.category_id, None)
    .await
    .unwrap_err();
  assert!(matches!(err, tutela_core::Error::AlreadyWithdrawn(_)));

  // The rejected call wrote nothing.
  assert_eq!(s.count_associations(record.record_id).await.unwrap(), 1);
}

#[tokio::test]
async fn withdraw_unknown_category_leaves_record_untouched() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(80.0), Some(80.0), Some(80.0)),
      None,
    )
    .await
    .unwrap();

  let err = registrar
    .withdraw(record.record_id, Uuid::new_v4(), None)
    .await
    .unwrap_err();
  assert!(matches!(err, tutela_core::Error::CategoryNotFound(_)));

  let fetched = s.get_record(record.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, RecordStatus::Approved);
  assert_eq!(s.count_associations(record.record_id).await.unwrap(), 0);
}

#[tokio::test]
async fn withdraw_missing_record_errors() {
  let s = store().await;
  let registrar = Registrar::new(&s);

  let err = registrar
    .withdraw(Uuid::new_v4(), Uuid::new_v4(), None)
    .await
    .unwrap_err();
  assert!(matches!(err, tutela_core::Error::RecordNotFound(_)));
}

// ─── Risk associations ───────────────────────────────────────────────────────

#[tokio::test]
async fn count_associations_is_zero_for_untouched_record() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(90.0), Some(90.0), Some(90.0)),
      None,
    )
    .await
    .unwrap();

  assert_eq!(s.count_associations(record.record_id).await.unwrap(), 0);
  assert!(s.list_associations(record.record_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn attach_risk_with_chosen_severity() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(65.0), Some(65.0), Some(65.0)),
      None,
    )
    .await
    .unwrap();

  let category = s
    .add_category(NewCategory { name: "Attendance".into(), description: None })
    .await
    .unwrap();

  let (_, association) = registrar
    .attach_risk(
      record.record_id,
      category.category_id,
      Severity::Medium,
      Some("frequent absences".into()),
    )
    .await
    .unwrap();

  assert_eq!(association.severity, Severity::Medium);
  assert_eq!(association.notes.as_deref(), Some("frequent absences"));

  // Attaching a risk does not change the record status.
  let fetched = s.get_record(record.record_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, RecordStatus::Failed);

  let listed = s.list_associations(record.record_id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].association_id, association.association_id);
}

// ─── List view ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_records_joins_names_and_counts_risks() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(40.0), Some(40.0), Some(40.0)),
      None,
    )
    .await
    .unwrap();

  let category = s
    .add_category(NewCategory { name: "Health".into(), description: None })
    .await
    .unwrap();
  registrar
    .withdraw(record.record_id, category.category_id, None)
    .await
    .unwrap();

  let overviews = s.list_records(&RecordFilter::default()).await.unwrap();
  assert_eq!(overviews.len(), 1);

  let view = &overviews[0];
  assert_eq!(view.record_id, record.record_id);
  assert_eq!(view.control_number, "20210001");
  assert_eq!(view.given_name, "Ana");
  assert_eq!(view.paternal_surname, "Lopez");
  assert_eq!(view.subject_name, "Algebra");
  assert_eq!(view.final_grade, Some(40.0));
  assert_eq!(view.status, RecordStatus::Withdrawn);
  assert_eq!(view.risk_count, 1);
}

#[tokio::test]
async fn list_records_filters_by_status_and_orders_newest_first() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let passing = UnitGrades::new(Some(90.0), Some(90.0), Some(90.0));
  let failing = UnitGrades::new(Some(10.0), Some(10.0), Some(10.0));

  let older = registrar
    .submit_enrollment(student_id, subject_id, 3, failing, None)
    .await
    .unwrap();
  let newer = registrar
    .submit_enrollment(student_id, subject_id, 4, passing, None)
    .await
    .unwrap();

  let all = s.list_records(&RecordFilter::default()).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].record_id, newer.record_id);
  assert_eq!(all[1].record_id, older.record_id);

  let failed = s
    .list_records(&RecordFilter { status: Some(RecordStatus::Failed) })
    .await
    .unwrap();
  assert_eq!(failed.len(), 1);
  assert_eq!(failed[0].record_id, older.record_id);
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reconciliation_surfaces_unconfirmed_withdrawals() {
  let s = store().await;
  let registrar = Registrar::new(&s);
  let (student_id, subject_id) = seed_student_and_subject(&s).await;

  let record = registrar
    .submit_enrollment(
      student_id,
      subject_id,
      3,
      UnitGrades::new(Some(80.0), Some(80.0), Some(80.0)),
      None,
    )
    .await
    .unwrap();

  let category = s
    .add_category(NewCategory { name: "Health".into(), description: None })
    .await
    .unwrap();
  let factor = s
    .add_factor(tutela_core::risk::NewFactor {
      category_id: category.category_id,
      name:        "Health".into(),
      description: None,
    })
    .await
    .unwrap();

  assert!(s.list_unconfirmed_withdrawals().await.unwrap().is_empty());

  // A high-severity association with no status flip: the shape left behind
  // when the final withdraw step fails.
  s.add_association(NewAssociation {
    record_id: record.record_id,
    factor_id: factor.factor_id,
    severity:  Severity::High,
    notes:     Some(DEFAULT_WITHDRAWAL_NOTES.into()),
  })
  .await
  .unwrap();

  let orphaned = s.list_unconfirmed_withdrawals().await.unwrap();
  assert_eq!(orphaned.len(), 1);
  assert_eq!(orphaned[0].record_id, record.record_id);

  // Completing the withdrawal clears the reconciliation queue.
  s.set_record_status(record.record_id, RecordStatus::Withdrawn)
    .await
    .unwrap();
  assert!(s.list_unconfirmed_withdrawals().await.unwrap().is_empty());
}
