use serde::{Deserialize, Serialize};

/// A rule toggle plus optional attached configuration (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRecord {
    pub rule_key: String,
    pub enabled: bool,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Eligibility policy for `study_hall_teacher_eligibility`'s config payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StudyHallTeacherEligibility {
    #[serde(default)]
    pub allow_full_time: bool,
    #[serde(default)]
    pub allow_part_time: bool,
}

impl Default for StudyHallTeacherEligibility {
    fn default() -> Self {
        Self {
            allow_full_time: true,
            allow_part_time: false,
        }
    }
}

/// `study_hall_grades`'s config payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyHallGrades {
    #[serde(default)]
    pub grades: Vec<String>,
}
