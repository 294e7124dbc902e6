//! Hard invariant checks (§3 I1-I6, §8 P1-P9): a `ScheduleOption` that fails
//! any of these has a bug upstream, not merely a suboptimal score.

use crate::engine::output::ScheduleOption;
use crate::engine::rules::{RuleSet, NO_DUPLICATE_SUBJECTS};
use crate::engine::schedule_builder::rebuild_grade_grids;
use crate::types::{Day, Grade};
use crate::validator::{Severity, Violation};
use std::collections::HashSet;

/// I3: no grade has the same subject twice on the same day, when the rule is enabled.
pub fn check_duplicate_subjects(option: &ScheduleOption, rules: &RuleSet) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !rules.enabled(NO_DUPLICATE_SUBJECTS) {
        return violations;
    }

    for (grade_name, grid) in &option.grade_grids {
        for day in Day::all() {
            let mut seen = HashSet::new();
            for block in crate::types::Block::all() {
                let Some(cell) = grid.get(crate::types::Slot::new(day, block)) else {
                    continue;
                };
                if !seen.insert(cell.subject.clone()) {
                    violations.push(Violation {
                        constraint: "NoDuplicateSubjects".to_string(),
                        message: format!(
                            "grade '{grade_name}' has subject '{}' twice on {day}",
                            cell.subject
                        ),
                        severity: Severity::Error,
                    });
                }
            }
        }
    }

    violations
}

/// I5: each placed study-hall group's grades are free at the assigned slot, and
/// no grade carries two study halls on the same day.
pub fn check_study_hall_placements(option: &ScheduleOption) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut days_seen: std::collections::HashMap<&str, HashSet<Day>> = std::collections::HashMap::new();

    for assignment in &option.study_hall_assignments {
        let (Some(teacher), Some(day), Some(block)) = (&assignment.teacher, assignment.day, assignment.block)
        else {
            continue;
        };

        let slot = crate::types::Slot::new(day, block);
        let matches_cell = option
            .teacher_grids
            .get(teacher)
            .and_then(|grid| grid.get(slot))
            .map(|cell| cell.is_study_hall() && cell.grade_display == assignment.group)
            .unwrap_or(false);
        if !matches_cell {
            violations.push(Violation {
                constraint: "StudyHallSlotMismatch".to_string(),
                message: format!(
                    "study hall '{}' claims {teacher} at {day} P{} but the teacher grid disagrees",
                    assignment.group, block.0
                ),
                severity: Severity::Error,
            });
        }

        let seen = days_seen.entry(assignment.group.as_str()).or_default();
        if !seen.insert(day) {
            violations.push(Violation {
                constraint: "DuplicateStudyHallDay".to_string(),
                message: format!("group '{}' has two study halls on {day}", assignment.group),
                severity: Severity::Error,
            });
        }
    }

    violations
}

/// I6: the grade grid is always a projection of the teacher grid via the
/// grade parser; recompute it and diff cell-by-cell.
pub fn check_grade_grid_is_projection(option: &ScheduleOption, grades: &[Grade]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let recomputed = rebuild_grade_grids(&option.teacher_grids, grades);

    for (grade_name, grid) in &option.grade_grids {
        let Some(expected) = recomputed.get(grade_name) else {
            violations.push(Violation {
                constraint: "GradeGridProjection".to_string(),
                message: format!("grade '{grade_name}' is missing from the recomputed projection"),
                severity: Severity::Error,
            });
            continue;
        };
        for slot in crate::types::Slot::all() {
            if grid.get(slot) != expected.get(slot) {
                violations.push(Violation {
                    constraint: "GradeGridProjection".to_string(),
                    message: format!("grade '{grade_name}' grid disagrees with its teacher-grid projection at {slot}"),
                    severity: Severity::Error,
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::{GradeCell, GradeGrid, TeacherCell, TeacherGrid};
    use crate::types::{Block, RuleRecord, Slot};
    use std::collections::HashMap;

    fn option_with_grade_grid(grid: GradeGrid) -> ScheduleOption {
        let mut grade_grids = HashMap::new();
        grade_grids.insert("1st Grade".to_string(), grid);
        ScheduleOption {
            option_number: 1,
            seed: 0,
            teacher_grids: HashMap::new(),
            grade_grids,
            study_hall_assignments: Vec::new(),
            teacher_stats: HashMap::new(),
            back_to_back_issues: 0,
            study_halls_placed: 0,
        }
    }

    #[test]
    fn flags_repeated_subject_on_same_day() {
        let mut grid = GradeGrid::empty();
        grid.set(
            Slot::new(Day(0), Block(1)),
            GradeCell { teacher: "T1".into(), subject: "Math".into() },
        );
        grid.set(
            Slot::new(Day(0), Block(2)),
            GradeCell { teacher: "T1".into(), subject: "Math".into() },
        );
        let option = option_with_grade_grid(grid);
        let rules = RuleSet::new(&[]);
        let violations = check_duplicate_subjects(&option, &rules);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn respects_disabled_rule() {
        let mut grid = GradeGrid::empty();
        grid.set(
            Slot::new(Day(0), Block(1)),
            GradeCell { teacher: "T1".into(), subject: "Math".into() },
        );
        grid.set(
            Slot::new(Day(0), Block(2)),
            GradeCell { teacher: "T1".into(), subject: "Math".into() },
        );
        let option = option_with_grade_grid(grid);
        let rule_records = vec![RuleRecord {
            rule_key: NO_DUPLICATE_SUBJECTS.to_string(),
            enabled: false,
            config: None,
        }];
        let rules = RuleSet::new(&rule_records);
        assert!(check_duplicate_subjects(&option, &rules).is_empty());
    }

    #[test]
    fn projection_matches_freshly_rebuilt_grid() {
        let mut teacher_grids = HashMap::new();
        let mut grid = TeacherGrid::empty();
        grid.set(Slot::new(Day(0), Block(1)), TeacherCell { grade_display: "1st Grade".into(), subject: "Math".into() });
        teacher_grids.insert("T1".to_string(), grid);

        let grades = vec![Grade { name: "1st Grade".to_string(), sort_order: 1 }];
        let grade_grids = rebuild_grade_grids(&teacher_grids, &grades);

        let option = ScheduleOption {
            option_number: 1,
            seed: 0,
            teacher_grids,
            grade_grids,
            study_hall_assignments: Vec::new(),
            teacher_stats: HashMap::new(),
            back_to_back_issues: 0,
            study_halls_placed: 0,
        };

        assert!(check_grade_grid_is_projection(&option, &grades).is_empty());
    }
}
