//! Stats & Reconciliation (§4.9): recount teaching/study-hall/open per teacher
//! and reconcile the study-hall assignment list against the actual grids after
//! external edits to the teacher grid (invariant I5).

use super::grid::{TeacherGrid, TeacherGrids};
use super::study_hall::StudyHallAssignment;
use crate::types::{Block, Day, Slot, Teacher, BLOCKS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherStats {
    pub teaching: usize,
    pub study_hall: usize,
    pub open: usize,
    pub total_used: usize,
    pub back_to_back: u32,
}

fn count_back_to_back(grid: &TeacherGrid) -> u32 {
    let mut count = 0u32;
    for day in Day::all() {
        for block in 1..BLOCKS_PER_DAY {
            let first = Slot::new(day, Block(block));
            let second = Slot::new(day, Block(block + 1));
            let first_idle = grid
                .get(first)
                .map(|c| c.is_open() || c.is_study_hall())
                .unwrap_or(true);
            let second_idle = grid
                .get(second)
                .map(|c| c.is_open() || c.is_study_hall())
                .unwrap_or(true);
            if first_idle && second_idle {
                count += 1;
            }
        }
    }
    count
}

/// One teacher's stats for one grid (§4.9 first paragraph).
pub fn stats_for_grid(grid: &TeacherGrid, full_time: bool) -> TeacherStats {
    let mut stats = TeacherStats::default();
    for (_slot, cell) in grid.iter() {
        if cell.is_open() {
            stats.open += 1;
        } else if cell.is_study_hall() {
            stats.study_hall += 1;
        } else {
            stats.teaching += 1;
        }
    }
    stats.total_used = stats.teaching + stats.study_hall;
    if full_time {
        stats.back_to_back = count_back_to_back(grid);
    }
    stats
}

/// Per-teacher stats across the whole roster.
pub fn compute_teacher_stats(teachers: &[Teacher], grids: &TeacherGrids) -> HashMap<String, TeacherStats> {
    teachers
        .iter()
        .filter_map(|t| {
            grids
                .get(&t.name)
                .map(|grid| (t.name.clone(), stats_for_grid(grid, t.status.is_full_time())))
        })
        .collect()
}

/// `backToBackIssues(option)`, §4.9/P10.
pub fn total_back_to_back_issues(stats: &HashMap<String, TeacherStats>) -> u32 {
    stats.values().map(|s| s.back_to_back).sum()
}

/// `studyHallsPlaced(option)`, §4.9/P11.
pub fn count_study_halls_placed(assignments: &[StudyHallAssignment]) -> usize {
    assignments.iter().filter(|a| a.teacher.is_some()).count()
}

/// Reconcile a list of study-hall assignments against the actual teacher grids
/// after an external mutation (§4.9 `reconcileStudyHallAssignments`).
///
/// Walks every Study-Hall-tagged cell in the grids, keyed by `(group, teacher, day,
/// block)`. Each input assignment is accepted verbatim if it matches a cell;
/// otherwise the group is relocated to any unmatched cell with the same group
/// name; otherwise it is marked unplaced. Finally, any Study-Hall cell present
/// in the grids but absent from the input list is appended.
pub fn reconcile_study_hall_assignments(
    assignments: &[StudyHallAssignment],
    teacher_grids: &TeacherGrids,
) -> Vec<StudyHallAssignment> {
    let mut grid_cells: Vec<(String, String, Day, Block)> = Vec::new();
    for (teacher_name, grid) in teacher_grids {
        for (slot, cell) in grid.iter() {
            if cell.is_study_hall() {
                grid_cells.push((
                    cell.grade_display.clone(),
                    teacher_name.clone(),
                    slot.day(),
                    slot.block(),
                ));
            }
        }
    }

    let mut matched = vec![false; grid_cells.len()];
    let mut result = Vec::with_capacity(assignments.len());

    for a in assignments {
        if let (Some(teacher), Some(day), Some(block)) = (&a.teacher, a.day, a.block) {
            if let Some(pos) = grid_cells.iter().enumerate().position(|(i, (g, t, d, b))| {
                !matched[i] && g == &a.group && t == teacher && *d == day && *b == block
            }) {
                matched[pos] = true;
                result.push(a.clone());
                continue;
            }
        }

        if let Some(pos) = grid_cells
            .iter()
            .enumerate()
            .position(|(i, (g, ..))| !matched[i] && g == &a.group)
        {
            matched[pos] = true;
            let (group, teacher, day, block) = grid_cells[pos].clone();
            result.push(StudyHallAssignment {
                group,
                teacher: Some(teacher),
                day: Some(day),
                block: Some(block),
            });
            continue;
        }

        result.push(StudyHallAssignment {
            group: a.group.clone(),
            teacher: None,
            day: None,
            block: None,
        });
    }

    for (i, (group, teacher, day, block)) in grid_cells.into_iter().enumerate() {
        if !matched[i] {
            result.push(StudyHallAssignment {
                group,
                teacher: Some(teacher),
                day: Some(day),
                block: Some(block),
            });
        }
    }

    result
}
