//! Core types and trait definitions for the tutela academic record tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod grades;
pub mod program;
pub mod record;
pub mod registrar;
pub mod risk;
pub mod store;
pub mod student;
pub mod subject;

pub use error::{Error, Result};
