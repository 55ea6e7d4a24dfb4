//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tutela_core::{
  program::{NewProgram, Program},
  record::{EnrollmentRecord, NewRecord, RecordOverview, RecordStatus},
  risk::{NewAssociation, NewCategory, NewFactor, RiskAssociation, RiskCategory, RiskFactor},
  store::{RecordFilter, RecordStore},
  student::{Student, StudentProfile},
  subject::{NewSubject, Subject},
};

use crate::{
  encode::{
    encode_dt, encode_severity, encode_status, encode_uuid, RawAssociation, RawCategory,
    RawFactor, RawOverview, RawProgram, RawRecord, RawStudent, RawSubject,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Columns shared by every overview query; the correlated subquery counts the
/// record's risk associations.
const OVERVIEW_SELECT: &str = "
  SELECT
    r.record_id, st.control_number, st.given_name,
    st.paternal_surname, st.maternal_surname,
    su.name AS subject_name, r.semester, r.final_grade, r.status,
    (SELECT COUNT(*) FROM risk_associations a
      WHERE a.record_id = r.record_id) AS risk_count,
    r.created_at
  FROM enrollment_records r
  JOIN students st ON st.student_id = r.student_id
  JOIN subjects su ON su.subject_id = r.subject_id";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tutela record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStudent> {
  Ok(RawStudent {
    student_id:       row.get(0)?,
    control_number:   row.get(1)?,
    given_name:       row.get(2)?,
    paternal_surname: row.get(3)?,
    maternal_surname: row.get(4)?,
    program_id:       row.get(5)?,
    current_semester: row.get(6)?,
    created_at:       row.get(7)?,
    updated_at:       row.get(8)?,
  })
}

fn read_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
  Ok(RawRecord {
    record_id:   row.get(0)?,
    student_id:  row.get(1)?,
    subject_id:  row.get(2)?,
    semester:    row.get(3)?,
    unit1_grade: row.get(4)?,
    unit2_grade: row.get(5)?,
    unit3_grade: row.get(6)?,
    final_grade: row.get(7)?,
    attendance:  row.get(8)?,
    status:      row.get(9)?,
    created_at:  row.get(10)?,
    updated_at:  row.get(11)?,
  })
}

fn read_overview(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawOverview> {
  Ok(RawOverview {
    record_id:        row.get(0)?,
    control_number:   row.get(1)?,
    given_name:       row.get(2)?,
    paternal_surname: row.get(3)?,
    maternal_surname: row.get(4)?,
    subject_name:     row.get(5)?,
    semester:         row.get(6)?,
    final_grade:      row.get(7)?,
    status:           row.get(8)?,
    risk_count:       row.get(9)?,
    created_at:       row.get(10)?,
  })
}

const STUDENT_COLUMNS: &str = "student_id, control_number, given_name, \
   paternal_surname, maternal_surname, program_id, current_semester, \
   created_at, updated_at";

const RECORD_COLUMNS: &str = "record_id, student_id, subject_id, semester, \
   unit1_grade, unit2_grade, unit3_grade, final_grade, attendance, status, \
   created_at, updated_at";

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Programs ──────────────────────────────────────────────────────────────

  async fn add_program(&self, input: NewProgram) -> Result<Program> {
    let program = Program {
      program_id: Uuid::new_v4(),
      name:       input.name,
      code:       input.code,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(program.program_id);
    let name     = program.name.clone();
    let code     = program.code.clone();
    let at_str   = encode_dt(program.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programs (program_id, name, code, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, code, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(program)
  }

  async fn get_program(&self, id: Uuid) -> Result<Option<Program>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProgram> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT program_id, name, code, created_at FROM programs
             WHERE program_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawProgram {
                program_id: row.get(0)?,
                name:       row.get(1)?,
                code:       row.get(2)?,
                created_at: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProgram::into_program).transpose()
  }

  async fn list_programs(&self) -> Result<Vec<Program>> {
    let raws: Vec<RawProgram> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT program_id, name, code, created_at FROM programs ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProgram {
              program_id: row.get(0)?,
              name:       row.get(1)?,
              code:       row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProgram::into_program).collect()
  }

  async fn delete_program(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM programs WHERE program_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::ProgramNotFound(id));
    }
    Ok(())
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn add_subject(&self, input: NewSubject) -> Result<Subject> {
    let subject = Subject {
      subject_id: Uuid::new_v4(),
      name:       input.name,
      code:       input.code,
      semester:   input.semester,
      program_id: input.program_id,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(subject.subject_id);
    let name        = subject.name.clone();
    let code        = subject.code.clone();
    let semester    = subject.semester as i64;
    let program_str = subject.program_id.map(encode_uuid);
    let at_str      = encode_dt(subject.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (subject_id, name, code, semester, program_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, code, semester, program_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(subject)
  }

  async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT subject_id, name, code, semester, program_id, created_at
             FROM subjects WHERE subject_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawSubject {
                subject_id: row.get(0)?,
                name:       row.get(1)?,
                code:       row.get(2)?,
                semester:   row.get(3)?,
                program_id: row.get(4)?,
                created_at: row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }

  async fn list_subjects(&self, program: Option<Uuid>) -> Result<Vec<Subject>> {
    let program_str = program.map(encode_uuid);

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubject> {
          Ok(RawSubject {
            subject_id: row.get(0)?,
            name:       row.get(1)?,
            code:       row.get(2)?,
            semester:   row.get(3)?,
            program_id: row.get(4)?,
            created_at: row.get(5)?,
          })
        }

        let rows = if let Some(p) = program_str {
          let mut stmt = conn.prepare(
            "SELECT subject_id, name, code, semester, program_id, created_at
             FROM subjects WHERE program_id = ?1 ORDER BY name",
          )?;
          stmt
            .query_map(rusqlite::params![p], read)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT subject_id, name, code, semester, program_id, created_at
             FROM subjects ORDER BY name",
          )?;
          stmt.query_map([], read)?.collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  async fn delete_subject(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM subjects WHERE subject_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::SubjectNotFound(id));
    }
    Ok(())
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn insert_student(&self, profile: &StudentProfile) -> Result<Student> {
    let now = Utc::now();
    let student = Student {
      student_id:       Uuid::new_v4(),
      control_number:   profile.control_number.clone(),
      given_name:       profile.given_name.clone(),
      paternal_surname: profile.paternal_surname.clone(),
      maternal_surname: profile.maternal_surname.clone(),
      program_id:       profile.program_id,
      current_semester: profile.current_semester,
      created_at:       now,
      updated_at:       now,
    };

    let id_str      = encode_uuid(student.student_id);
    let control     = student.control_number.clone();
    let given       = student.given_name.clone();
    let paternal    = student.paternal_surname.clone();
    let maternal    = student.maternal_surname.clone();
    let program_str = student.program_id.map(encode_uuid);
    let semester    = student.current_semester as i64;
    let at_str      = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (
             student_id, control_number, given_name, paternal_surname,
             maternal_surname, program_id, current_semester,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, control, given, paternal, maternal, program_str, semester, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(student)
  }

  async fn update_student(&self, id: Uuid, profile: &StudentProfile) -> Result<Student> {
    let id_str      = encode_uuid(id);
    let given       = profile.given_name.clone();
    let paternal    = profile.paternal_surname.clone();
    let maternal    = profile.maternal_surname.clone();
    let program_str = profile.program_id.map(encode_uuid);
    let semester    = profile.current_semester as i64;
    let now_str     = encode_dt(Utc::now());

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE students SET
             given_name = ?2, paternal_surname = ?3, maternal_surname = ?4,
             program_id = ?5, current_semester = ?6, updated_at = ?7
           WHERE student_id = ?1",
          rusqlite::params![id_str, given, paternal, maternal, program_str, semester, now_str],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
              rusqlite::params![id_str],
              read_student,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::StudentNotFound(id))?.into_student()
  }

  async fn find_student(&self, control_number: &str) -> Result<Option<Student>> {
    let control = control_number.to_owned();

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE control_number = ?1"),
              rusqlite::params![control],
              read_student,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
              rusqlite::params![id_str],
              read_student,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students ORDER BY paternal_surname"
        ))?;
        let rows = stmt
          .query_map([], read_student)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  // ── Enrollment records ────────────────────────────────────────────────────

  async fn insert_record(&self, input: NewRecord) -> Result<EnrollmentRecord> {
    let now = Utc::now();
    let record = EnrollmentRecord {
      record_id:   Uuid::new_v4(),
      student_id:  input.student_id,
      subject_id:  input.subject_id,
      semester:    input.semester,
      grades:      input.grades,
      final_grade: input.final_grade,
      attendance:  input.attendance,
      status:      input.status,
      created_at:  now,
      updated_at:  now,
    };

    let id_str      = encode_uuid(record.record_id);
    let student_str = encode_uuid(record.student_id);
    let subject_str = encode_uuid(record.subject_id);
    let semester    = record.semester as i64;
    let grades      = record.grades;
    let final_grade = record.final_grade;
    let attendance  = record.attendance;
    let status_str  = encode_status(record.status).to_owned();
    let at_str      = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO enrollment_records (
             record_id, student_id, subject_id, semester,
             unit1_grade, unit2_grade, unit3_grade, final_grade,
             attendance, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            id_str,
            student_str,
            subject_str,
            semester,
            grades.unit1,
            grades.unit2,
            grades.unit3,
            final_grade,
            attendance,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get_record(&self, id: Uuid) -> Result<Option<EnrollmentRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECORD_COLUMNS} FROM enrollment_records WHERE record_id = ?1"),
              rusqlite::params![id_str],
              read_record,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn set_record_status(&self, id: Uuid, status: RecordStatus) -> Result<()> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status).to_owned();
    let now_str    = encode_dt(Utc::now());

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE enrollment_records SET status = ?2, updated_at = ?3
           WHERE record_id = ?1",
          rusqlite::params![id_str, status_str, now_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::RecordNotFound(id));
    }
    Ok(())
  }

  async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordOverview>> {
    let status_str = filter.status.map(encode_status).map(str::to_owned);

    let raws: Vec<RawOverview> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "{OVERVIEW_SELECT} WHERE r.status = ?1 ORDER BY r.created_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![s], read_overview)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("{OVERVIEW_SELECT} ORDER BY r.created_at DESC"))?;
          stmt.query_map([], read_overview)?.collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOverview::into_overview).collect()
  }

  async fn list_unconfirmed_withdrawals(&self) -> Result<Vec<RecordOverview>> {
    let raws: Vec<RawOverview> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "{OVERVIEW_SELECT}
           WHERE r.status != 'withdrawn'
             AND EXISTS (SELECT 1 FROM risk_associations a
                          WHERE a.record_id = r.record_id AND a.severity = 'high')
           ORDER BY r.created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], read_overview)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOverview::into_overview).collect()
  }

  // ── Risk reference data ───────────────────────────────────────────────────

  async fn add_category(&self, input: NewCategory) -> Result<RiskCategory> {
    let category = RiskCategory {
      category_id: Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(category.category_id);
    let name        = category.name.clone();
    let description = category.description.clone();
    let at_str      = encode_dt(category.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO risk_categories (category_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(category)
  }

  async fn get_category(&self, id: Uuid) -> Result<Option<RiskCategory>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT category_id, name, description, created_at
             FROM risk_categories WHERE category_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawCategory {
                category_id: row.get(0)?,
                name:        row.get(1)?,
                description: row.get(2)?,
                created_at:  row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCategory::into_category).transpose()
  }

  async fn list_categories(&self) -> Result<Vec<RiskCategory>> {
    let raws: Vec<RawCategory> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT category_id, name, description, created_at
           FROM risk_categories ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCategory {
              category_id: row.get(0)?,
              name:        row.get(1)?,
              description: row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCategory::into_category).collect()
  }

  async fn delete_category(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM risk_categories WHERE category_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::CategoryNotFound(id));
    }
    Ok(())
  }

  async fn find_factor_for_category(&self, category: Uuid) -> Result<Option<RiskFactor>> {
    let category_str = encode_uuid(category);

    let raw: Option<RawFactor> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT factor_id, category_id, name, description, created_at
             FROM risk_factors WHERE category_id = ?1
             ORDER BY created_at LIMIT 1",
            rusqlite::params![category_str],
            |row| {
              Ok(RawFactor {
                factor_id:   row.get(0)?,
                category_id: row.get(1)?,
                name:        row.get(2)?,
                description: row.get(3)?,
                created_at:  row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFactor::into_factor).transpose()
  }

  async fn add_factor(&self, input: NewFactor) -> Result<RiskFactor> {
    let factor = RiskFactor {
      factor_id:   Uuid::new_v4(),
      category_id: input.category_id,
      name:        input.name,
      description: input.description,
      created_at:  Utc::now(),
    };

    let id_str       = encode_uuid(factor.factor_id);
    let category_str = encode_uuid(factor.category_id);
    let name         = factor.name.clone();
    let description  = factor.description.clone();
    let at_str       = encode_dt(factor.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO risk_factors (factor_id, category_id, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, category_str, name, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(factor)
  }

  async fn list_factors(&self, category: Option<Uuid>) -> Result<Vec<RiskFactor>> {
    let category_str = category.map(encode_uuid);

    let raws: Vec<RawFactor> = self
      .conn
      .call(move |conn| {
        fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFactor> {
          Ok(RawFactor {
            factor_id:   row.get(0)?,
            category_id: row.get(1)?,
            name:        row.get(2)?,
            description: row.get(3)?,
            created_at:  row.get(4)?,
          })
        }

        let rows = if let Some(c) = category_str {
          let mut stmt = conn.prepare(
            "SELECT factor_id, category_id, name, description, created_at
             FROM risk_factors WHERE category_id = ?1 ORDER BY name",
          )?;
          stmt
            .query_map(rusqlite::params![c], read)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT factor_id, category_id, name, description, created_at
             FROM risk_factors ORDER BY name",
          )?;
          stmt.query_map([], read)?.collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFactor::into_factor).collect()
  }

  // ── Associations ──────────────────────────────────────────────────────────

  async fn add_association(&self, input: NewAssociation) -> Result<RiskAssociation> {
    let association = RiskAssociation {
      association_id: Uuid::new_v4(),
      record_id:      input.record_id,
      factor_id:      input.factor_id,
      severity:       input.severity,
      notes:          input.notes,
      created_at:     Utc::now(),
    };

    let id_str       = encode_uuid(association.association_id);
    let record_str   = encode_uuid(association.record_id);
    let factor_str   = encode_uuid(association.factor_id);
    let severity_str = encode_severity(association.severity).to_owned();
    let notes        = association.notes.clone();
    let at_str       = encode_dt(association.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO risk_associations (
             association_id, record_id, factor_id, severity, notes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, record_str, factor_str, severity_str, notes, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(association)
  }

  async fn list_associations(&self, record: Uuid) -> Result<Vec<RiskAssociation>> {
    let record_str = encode_uuid(record);

    let raws: Vec<RawAssociation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT association_id, record_id, factor_id, severity, notes, created_at
           FROM risk_associations WHERE record_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![record_str], |row| {
            Ok(RawAssociation {
              association_id: row.get(0)?,
              record_id:      row.get(1)?,
              factor_id:      row.get(2)?,
              severity:       row.get(3)?,
              notes:          row.get(4)?,
              created_at:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAssociation::into_association)
      .collect()
  }

  async fn count_associations(&self, record: Uuid) -> Result<u64> {
    let record_str = encode_uuid(record);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM risk_associations WHERE record_id = ?1",
          rusqlite::params![record_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }
}
