//! Output contracts for one generation run (§6 "Generation output").

use super::grid::{GradeGrids, TeacherGrids};
use super::stats::TeacherStats;
use super::study_hall::StudyHallAssignment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One surviving candidate assignment, fully annotated (§3 "Schedule option").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOption {
    pub option_number: usize,
    pub seed: u32,
    pub teacher_grids: TeacherGrids,
    pub grade_grids: GradeGrids,
    pub study_hall_assignments: Vec<StudyHallAssignment>,
    pub teacher_stats: HashMap<String, TeacherStats>,
    pub back_to_back_issues: u32,
    pub study_halls_placed: usize,
}

/// §6 "status ∈ {success, infeasible, error}".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Success,
    Infeasible,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub options: Vec<ScheduleOption>,
}

impl GenerationResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: GenerationStatus::Error,
            message: Some(message.into()),
            options: Vec::new(),
        }
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self {
            status: GenerationStatus::Infeasible,
            message: Some(message.into()),
            options: Vec::new(),
        }
    }

    pub fn success(options: Vec<ScheduleOption>) -> Self {
        Self {
            status: GenerationStatus::Success,
            message: None,
            options,
        }
    }
}
