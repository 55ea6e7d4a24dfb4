//! SQL schema for the tutela SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS programs (
    program_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    code       TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    subject_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    code       TEXT,
    semester   INTEGER NOT NULL,
    program_id TEXT REFERENCES programs(program_id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    student_id       TEXT PRIMARY KEY,
    control_number   TEXT NOT NULL UNIQUE,
    given_name       TEXT NOT NULL,
    paternal_surname TEXT NOT NULL,
    maternal_surname TEXT NOT NULL,
    program_id       TEXT REFERENCES programs(program_id),
    current_semester INTEGER NOT NULL,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

-- Submissions are insert-only: one row per submission event, never merged.
CREATE TABLE IF NOT EXISTS enrollment_records (
    record_id   TEXT PRIMARY KEY,
    student_id  TEXT NOT NULL REFERENCES students(student_id),
    subject_id  TEXT NOT NULL REFERENCES subjects(subject_id),
    semester    INTEGER NOT NULL,
    unit1_grade REAL,
    unit2_grade REAL,
    unit3_grade REAL,
    final_grade REAL,
    attendance  REAL,
    status      TEXT NOT NULL,   -- 'in_progress' | 'approved' | 'failed' | 'withdrawn'
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS risk_categories (
    category_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS risk_factors (
    factor_id   TEXT PRIMARY KEY,
    category_id TEXT NOT NULL REFERENCES risk_categories(category_id),
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS risk_associations (
    association_id TEXT PRIMARY KEY,
    record_id      TEXT NOT NULL REFERENCES enrollment_records(record_id),
    factor_id      TEXT NOT NULL REFERENCES risk_factors(factor_id),
    severity       TEXT NOT NULL,   -- 'low' | 'medium' | 'high'
    notes          TEXT,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS records_student_idx     ON enrollment_records(student_id);
CREATE INDEX IF NOT EXISTS records_status_idx      ON enrollment_records(status);
CREATE INDEX IF NOT EXISTS factors_category_idx    ON risk_factors(category_id);
CREATE INDEX IF NOT EXISTS associations_record_idx ON risk_associations(record_id);

PRAGMA user_version = 1;
";
