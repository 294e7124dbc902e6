use serde::{Deserialize, Serialize};

/// Employment status. Only full-time teachers are counted for back-to-back
/// and spread-open scoring (§4.8) and default study-hall eligibility (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeacherStatus {
    FullTime,
    PartTime,
}

impl TeacherStatus {
    pub fn is_full_time(&self) -> bool {
        matches!(self, TeacherStatus::FullTime)
    }
}

/// Whether a teacher may supervise a study hall. Absent in input ≡ `Eligible` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudyHallEligibility {
    Eligible,
    Excluded,
}

impl Default for StudyHallEligibility {
    fn default() -> Self {
        StudyHallEligibility::Eligible
    }
}

/// A member of the teaching staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub status: TeacherStatus,
    #[serde(default)]
    pub can_supervise_study_hall: StudyHallEligibility,
}

impl Teacher {
    pub fn is_study_hall_eligible(&self) -> bool {
        matches!(self.can_supervise_study_hall, StudyHallEligibility::Eligible)
    }
}
