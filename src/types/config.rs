use super::{Class, Grade, RuleRecord, Teacher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tunables for one generation run (§6: `options`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_num_options")]
    pub num_options: usize,
    #[serde(default = "default_num_attempts")]
    pub num_attempts: usize,
    #[serde(default = "default_timeout_per_attempt_ms")]
    pub timeout_per_attempt_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Teachers who had a study hall before regeneration and must keep one (refinement mode).
    #[serde(default)]
    pub teachers_needing_study_halls: Vec<String>,
    #[serde(default)]
    pub allow_study_hall_reassignment: bool,
}

fn default_num_options() -> usize {
    3
}

fn default_num_attempts() -> usize {
    50
}

fn default_timeout_per_attempt_ms() -> u64 {
    5_000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_options: default_num_options(),
            num_attempts: default_num_attempts(),
            timeout_per_attempt_ms: default_timeout_per_attempt_ms(),
            seed: None,
            teachers_needing_study_halls: Vec::new(),
            allow_study_hall_reassignment: false,
        }
    }
}

/// A teacher's frozen (locked) grid, identified by teacher name, used in refinement
/// mode (§6: `lockedTeachers`). Keyed externally; carried here just as the grid content.
pub type LockedTeacherGrids = HashMap<String, crate::engine::grid::TeacherGrid>;

/// All input needed for one generation run (§6: Generation input).
#[derive(Debug)]
pub struct GenerationInput {
    pub teachers: Vec<Teacher>,
    pub classes: Vec<Class>,
    pub rules: Vec<RuleRecord>,
    pub grades: Vec<Grade>,
    pub config: GenerationConfig,
    pub locked_teachers: LockedTeacherGrids,
}

impl Default for GenerationInput {
    fn default() -> Self {
        Self {
            teachers: Vec::new(),
            classes: Vec::new(),
            rules: Vec::new(),
            grades: Vec::new(),
            config: GenerationConfig::default(),
            locked_teachers: HashMap::new(),
        }
    }
}
