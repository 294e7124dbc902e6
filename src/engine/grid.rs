//! Dense 5x5 grid snapshot type (§9 Design Notes): grids are arrays indexed by
//! slot with a small `Option<Entry>` payload. Copies are array copies, not
//! deep clones of nested maps.

use crate::types::Slot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::constants::{GRID_SIZE, OPEN_SUBJECT, STUDY_HALL_SUBJECT};

/// A teacher-grid cell: what grade(s) and subject occupy this (day, block).
/// Empty `grade_display` for `OPEN` (§3: "Empty grade_display for OPEN").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherCell {
    pub grade_display: String,
    pub subject: String,
}

impl TeacherCell {
    pub fn open() -> Self {
        Self {
            grade_display: String::new(),
            subject: OPEN_SUBJECT.to_string(),
        }
    }

    pub fn study_hall(grade_display: String) -> Self {
        Self {
            grade_display,
            subject: STUDY_HALL_SUBJECT.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.subject == OPEN_SUBJECT
    }

    pub fn is_study_hall(&self) -> bool {
        self.subject == STUDY_HALL_SUBJECT
    }
}

/// A grade-grid cell: which teacher and subject a grade attends at this slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCell {
    pub teacher: String,
    pub subject: String,
}

/// Dense array-backed 5x5 weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid5x5<T> {
    cells: Vec<Option<T>>,
}

impl<T> Grid5x5<T> {
    pub fn empty() -> Self {
        let mut cells = Vec::with_capacity(GRID_SIZE);
        cells.resize_with(GRID_SIZE, || None);
        Self { cells }
    }

    pub fn get(&self, slot: Slot) -> Option<&T> {
        self.cells[slot.0 as usize].as_ref()
    }

    pub fn set(&mut self, slot: Slot, value: T) {
        self.cells[slot.0 as usize] = Some(value);
    }

    pub fn clear(&mut self, slot: Slot) {
        self.cells[slot.0 as usize] = None;
    }

    pub fn is_free(&self, slot: Slot) -> bool {
        self.cells[slot.0 as usize].is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &T)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|v| (Slot(i as u8), v)))
    }
}

impl<T> Default for Grid5x5<T> {
    fn default() -> Self {
        Self::empty()
    }
}

pub type TeacherGrid = Grid5x5<TeacherCell>;
pub type GradeGrid = Grid5x5<GradeCell>;

/// Serialized form used to compare two candidates for diversity (§4.8): two
/// teacher grids are equal iff every cell matches.
pub fn teacher_grid_fingerprint(grid: &TeacherGrid) -> Vec<Option<(String, String)>> {
    (0..GRID_SIZE as u8)
        .map(|i| {
            grid.get(Slot(i))
                .map(|c| (c.grade_display.clone(), c.subject.clone()))
        })
        .collect()
}

/// Per-teacher-name grid bundle carried across a generation pass.
pub type TeacherGrids = HashMap<String, TeacherGrid>;
/// Per-grade-name grid bundle, rebuilt wholly from `TeacherGrids` after each pass
/// that mutates teaching assignments (§4.7, §9: "Grade-grid freshness").
pub type GradeGrids = HashMap<String, GradeGrid>;
