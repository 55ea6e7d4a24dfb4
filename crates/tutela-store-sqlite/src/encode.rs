//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Enums are stored as their snake_case names.

use chrono::{DateTime, Utc};
use tutela_core::{
  grades::UnitGrades,
  program::Program,
  record::{EnrollmentRecord, RecordOverview, RecordStatus},
  risk::{RiskAssociation, RiskCategory, RiskFactor, Severity},
  student::Student,
  subject::Subject,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── RecordStatus ────────────────────────────────────────────────────────────

pub fn encode_status(status: RecordStatus) -> &'static str {
  match status {
    RecordStatus::InProgress => "in_progress",
    RecordStatus::Approved => "approved",
    RecordStatus::Failed => "failed",
    RecordStatus::Withdrawn => "withdrawn",
  }
}

pub fn decode_status(s: &str) -> Result<RecordStatus> {
  match s {
    "in_progress" => Ok(RecordStatus::InProgress),
    "approved" => Ok(RecordStatus::Approved),
    "failed" => Ok(RecordStatus::Failed),
    "withdrawn" => Ok(RecordStatus::Withdrawn),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Severity ────────────────────────────────────────────────────────────────

pub fn encode_severity(severity: Severity) -> &'static str {
  match severity {
    Severity::Low => "low",
    Severity::Medium => "medium",
    Severity::High => "high",
  }
}

pub fn decode_severity(s: &str) -> Result<Severity> {
  match s {
    "low" => Ok(Severity::Low),
    "medium" => Ok(Severity::Medium),
    "high" => Ok(Severity::High),
    other => Err(Error::UnknownSeverity(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `programs` row.
pub struct RawProgram {
  pub program_id: String,
  pub name:       String,
  pub code:       Option<String>,
  pub created_at: String,
}

impl RawProgram {
  pub fn into_program(self) -> Result<Program> {
    Ok(Program {
      program_id: decode_uuid(&self.program_id)?,
      name:       self.name,
      code:       self.code,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `subjects` row.
pub struct RawSubject {
  pub subject_id: String,
  pub name:       String,
  pub code:       Option<String>,
  pub semester:   i64,
  pub program_id: Option<String>,
  pub created_at: String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      subject_id: decode_uuid(&self.subject_id)?,
      name:       self.name,
      code:       self.code,
      semester:   self.semester as u32,
      program_id: self.program_id.as_deref().map(decode_uuid).transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub student_id:       String,
  pub control_number:   String,
  pub given_name:       String,
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub program_id:       Option<String>,
  pub current_semester: i64,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawStudent {
  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id:       decode_uuid(&self.student_id)?,
      control_number:   self.control_number,
      given_name:       self.given_name,
      paternal_surname: self.paternal_surname,
      maternal_surname: self.maternal_surname,
      program_id:       self.program_id.as_deref().map(decode_uuid).transpose()?,
      current_semester: self.current_semester as u32,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `enrollment_records` row.
pub struct RawRecord {
  pub record_id:   String,
  pub student_id:  String,
  pub subject_id:  String,
  pub semester:    i64,
  pub unit1_grade: Option<f64>,
  pub unit2_grade: Option<f64>,
  pub unit3_grade: Option<f64>,
  pub final_grade: Option<f64>,
  pub attendance:  Option<f64>,
  pub status:      String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<EnrollmentRecord> {
    Ok(EnrollmentRecord {
      record_id:   decode_uuid(&self.record_id)?,
      student_id:  decode_uuid(&self.student_id)?,
      subject_id:  decode_uuid(&self.subject_id)?,
      semester:    self.semester as u32,
      grades:      UnitGrades::new(self.unit1_grade, self.unit2_grade, self.unit3_grade),
      final_grade: self.final_grade,
      attendance:  self.attendance,
      status:      decode_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// A record row joined with student and subject display fields plus the
/// association count.
pub struct RawOverview {
  pub record_id:        String,
  pub control_number:   String,
  pub given_name:       String,
  pub paternal_surname: String,
  pub maternal_surname: String,
  pub subject_name:     String,
  pub semester:         i64,
  pub final_grade:      Option<f64>,
  pub status:           String,
  pub risk_count:       i64,
  pub created_at:       String,
}

impl RawOverview {
  pub fn into_overview(self) -> Result<RecordOverview> {
    Ok(RecordOverview {
      record_id:        decode_uuid(&self.record_id)?,
      control_number:   self.control_number,
      given_name:       self.given_name,
      paternal_surname: self.paternal_surname,
      maternal_surname: self.maternal_surname,
      subject_name:     self.subject_name,
      semester:         self.semester as u32,
      final_grade:      self.final_grade,
      status:           decode_status(&self.status)?,
      risk_count:       self.risk_count as u64,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `risk_categories` row.
pub struct RawCategory {
  pub category_id: String,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawCategory {
  pub fn into_category(self) -> Result<RiskCategory> {
    Ok(RiskCategory {
      category_id: decode_uuid(&self.category_id)?,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `risk_factors` row.
pub struct RawFactor {
  pub factor_id:   String,
  pub category_id: String,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawFactor {
  pub fn into_factor(self) -> Result<RiskFactor> {
    Ok(RiskFactor {
      factor_id:   decode_uuid(&self.factor_id)?,
      category_id: decode_uuid(&self.category_id)?,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `risk_associations` row.
pub struct RawAssociation {
  pub association_id: String,
  pub record_id:      String,
  pub factor_id:      String,
  pub severity:       String,
  pub notes:          Option<String>,
  pub created_at:     String,
}

impl RawAssociation {
  pub fn into_association(self) -> Result<RiskAssociation> {
    Ok(RiskAssociation {
      association_id: decode_uuid(&self.association_id)?,
      record_id:      decode_uuid(&self.record_id)?,
      factor_id:      decode_uuid(&self.factor_id)?,
      severity:       decode_severity(&self.severity)?,
      notes:          self.notes,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}
