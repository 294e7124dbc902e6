//! Post-hoc invariant and scoring checks for a generated `ScheduleOption`
//! (§3 I1-I6, §4.8/§4.9), independent of the generation run that produced it —
//! useful for checking a schedule after a manual edit (§4.9 "external mutation").

mod hard_constraints;
mod soft_constraints;

pub use hard_constraints::*;
pub use soft_constraints::*;

use crate::engine::output::ScheduleOption;
use crate::engine::rules::RuleSet;
use crate::types::Grade;

/// Result of validating one `ScheduleOption`.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub score: SoftScore,
}

/// A constraint violation
#[derive(Debug, Clone)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Score for a soft constraint
#[derive(Debug, Clone)]
pub struct SoftScore {
    pub constraint: String,
    pub score: f64,
    pub max_score: f64,
    pub details: String,
}

/// Check a single option against every hard invariant and attach its soft score.
pub fn validate_option(option: &ScheduleOption, grades: &[Grade], rules: &RuleSet, desired_study_halls: usize) -> ValidationReport {
    let mut violations = Vec::new();
    violations.extend(check_duplicate_subjects(option, rules));
    violations.extend(check_study_hall_placements(option));
    violations.extend(check_grade_grid_is_projection(option, grades));

    ValidationReport {
        is_valid: violations.iter().all(|v| v.severity != Severity::Error),
        violations,
        score: score_option(option, desired_study_halls),
    }
}
