//! Rule Lookup (§4.2): answers "is rule X enabled?" and "what is rule X's config?"
//! with fail-open defaults — an absent key is enabled.

use crate::types::{RuleRecord, StudyHallGrades, StudyHallTeacherEligibility};
use std::collections::HashMap;

pub const NO_DUPLICATE_SUBJECTS: &str = "no_duplicate_subjects";
pub const NO_BTB_OPEN: &str = "no_btb_open";
pub const SPREAD_OPEN: &str = "spread_open";
pub const STUDY_HALL_DISTRIBUTION: &str = "study_hall_distribution";
pub const STUDY_HALL_GRADES: &str = "study_hall_grades";
pub const STUDY_HALL_TEACHER_ELIGIBILITY: &str = "study_hall_teacher_eligibility";

/// Owns a by-name index over the rule records supplied for one generation run.
pub struct RuleSet<'a> {
    by_key: HashMap<&'a str, &'a RuleRecord>,
}

impl<'a> RuleSet<'a> {
    pub fn new(rules: &'a [RuleRecord]) -> Self {
        let by_key = rules.iter().map(|r| (r.rule_key.as_str(), r)).collect();
        Self { by_key }
    }

    /// `true` when the key is absent (fail-open), otherwise the record's `enabled` flag.
    pub fn enabled(&self, key: &str) -> bool {
        self.by_key.get(key).map(|r| r.enabled).unwrap_or(true)
    }

    pub fn config(&self, key: &str) -> Option<&serde_json::Value> {
        self.by_key.get(key).and_then(|r| r.config.as_ref())
    }

    pub fn study_hall_grades(&self) -> StudyHallGrades {
        self.config(STUDY_HALL_GRADES)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// §4.2: if both flags are false, full-time is silently treated as allowed.
    pub fn study_hall_teacher_eligibility(&self) -> StudyHallTeacherEligibility {
        let parsed: StudyHallTeacherEligibility = self
            .config(STUDY_HALL_TEACHER_ELIGIBILITY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        if !parsed.allow_full_time && !parsed.allow_part_time {
            StudyHallTeacherEligibility {
                allow_full_time: true,
                allow_part_time: false,
            }
        } else {
            parsed
        }
    }
}
