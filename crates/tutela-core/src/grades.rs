//! Grade evaluation — the policy half of the academic record evaluator.
//!
//! A final grade is the arithmetic mean of the three unit grades, with any
//! missing unit counted as zero, rounded to two decimals. Classification is a
//! single inclusive threshold applied once, at record creation.

use serde::{Deserialize, Serialize};

use crate::record::RecordStatus;

/// Minimum final grade that counts as a pass.
pub const PASSING_GRADE: f64 = 70.0;

/// The three per-unit grades entered for one enrollment, each expected in
/// [0, 100]. Range validation is the presentation layer's concern.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UnitGrades {
  pub unit1: Option<f64>,
  pub unit2: Option<f64>,
  pub unit3: Option<f64>,
}

impl UnitGrades {
  pub fn new(unit1: Option<f64>, unit2: Option<f64>, unit3: Option<f64>) -> Self {
    Self { unit1, unit2, unit3 }
  }
}

/// Mean of the three units with missing units counted as zero, rounded to two
/// decimals. Total; there is no failure case.
pub fn final_grade(units: &UnitGrades) -> f64 {
  let sum = units.unit1.unwrap_or(0.0)
    + units.unit2.unwrap_or(0.0)
    + units.unit3.unwrap_or(0.0);
  round2(sum / 3.0)
}

/// Pass/fail classification of a computed final grade. The boundary is
/// inclusive: exactly [`PASSING_GRADE`] passes.
pub fn classify(final_grade: f64) -> RecordStatus {
  if final_grade >= PASSING_GRADE {
    RecordStatus::Approved
  } else {
    RecordStatus::Failed
  }
}

fn round2(x: f64) -> f64 { (x * 100.0).round() / 100.0 }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mean_of_three_units() {
    let g = UnitGrades::new(Some(80.0), Some(70.0), Some(90.0));
    assert_eq!(final_grade(&g), 80.0);
  }

  #[test]
  fn mean_rounds_to_two_decimals() {
    let g = UnitGrades::new(Some(70.0), Some(80.0), Some(95.0));
    assert_eq!(final_grade(&g), 81.67);
  }

  #[test]
  fn missing_units_count_as_zero() {
    let g = UnitGrades::new(Some(80.0), None, None);
    assert_eq!(final_grade(&g), 26.67);

    assert_eq!(final_grade(&UnitGrades::default()), 0.0);
  }

  #[test]
  fn pass_boundary_is_inclusive() {
    assert_eq!(classify(70.0), RecordStatus::Approved);
    assert_eq!(classify(69.99), RecordStatus::Failed);
    assert_eq!(classify(100.0), RecordStatus::Approved);
    assert_eq!(classify(0.0), RecordStatus::Failed);
  }
}
