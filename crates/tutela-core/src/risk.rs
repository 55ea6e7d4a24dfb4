//! Risk taxonomy — reasons contributing to student attrition.
//!
//! Categories and factors are reference data with a lifecycle independent of
//! enrollment. An association ties one factor to one enrollment record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How strongly a risk factor applies to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
}

impl std::fmt::Display for Severity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCategory {
  pub category_id: Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
  pub name:        String,
  pub description: Option<String>,
}

/// A concrete risk factor under a category. Withdrawals resolve a factor per
/// category, creating one (named after the category) on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
  pub factor_id:   Uuid,
  pub category_id: Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFactor {
  pub category_id: Uuid,
  pub name:        String,
  pub description: Option<String>,
}

/// A risk factor attached to one enrollment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssociation {
  pub association_id: Uuid,
  pub record_id:      Uuid,
  pub factor_id:      Uuid,
  pub severity:       Severity,
  pub notes:          Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::add_association`].
#[derive(Debug, Clone)]
pub struct NewAssociation {
  pub record_id: Uuid,
  pub factor_id: Uuid,
  pub severity:  Severity,
  pub notes:     Option<String>,
}
