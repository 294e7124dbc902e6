use super::slot::{Block, Day};
use serde::{Deserialize, Serialize};

/// One recurring course offering: a teacher teaching a subject to a grade (or
/// grade range / elective) some number of times per week.
///
/// `fixed_slots`, when non-empty, forces exactly `fixed_slots.len()` sessions onto
/// those declared (day, block) pairs; otherwise the class contributes
/// `days_per_week` free-placement sessions (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub teacher: String,
    pub grade_display: String,
    #[serde(default)]
    pub grades: Vec<String>,
    pub subject: String,
    pub days_per_week: u8,
    #[serde(default)]
    pub is_elective: bool,
    #[serde(default)]
    pub available_days: Option<Vec<Day>>,
    #[serde(default)]
    pub available_blocks: Option<Vec<Block>>,
    #[serde(default)]
    pub fixed_slots: Vec<(Day, Block)>,
}

impl Class {
    pub fn is_fixed(&self) -> bool {
        !self.fixed_slots.is_empty()
    }

    /// Number of sessions this class contributes to the session builder.
    pub fn session_count(&self) -> usize {
        if self.is_fixed() {
            self.fixed_slots.len()
        } else {
            self.days_per_week as usize
        }
    }

    pub fn is_elective_display(&self) -> bool {
        self.is_elective || self.grade_display.to_lowercase().contains("elective")
    }
}
