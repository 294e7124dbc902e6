//! Open-Block Redistributor (§4.7): swaps a taught cell into the second
//! position of a back-to-back open-or-study-hall pair, reducing adjacency
//! issues without touching any other invariant. Runs only when `no_btb_open`
//! is enabled; capped at `MAX_REDISTRIBUTE_ITERATIONS` swap attempts.

use super::grade_parser::parse_grades;
use super::grid::{GradeCell, GradeGrids, TeacherCell, TeacherGrids};
use super::rules::{RuleSet, NO_BTB_OPEN, NO_DUPLICATE_SUBJECTS};
use crate::engine::constants::MAX_REDISTRIBUTE_ITERATIONS;
use crate::types::{Block, Day, Grade, Slot, Teacher};

fn is_open_or_study_hall(cell: &TeacherCell) -> bool {
    cell.is_open() || cell.is_study_hall()
}

/// The earliest back-to-back pair in this teacher's grid, as `(first, second)`
/// slots on the same day. The redistributor always targets the second slot.
fn find_back_to_back_pair(grid: &super::grid::TeacherGrid) -> Option<(Slot, Slot)> {
    for day in Day::all() {
        for block in 1..crate::types::BLOCKS_PER_DAY {
            let first = Slot::new(day, Block(block));
            let second = Slot::new(day, Block(block + 1));
            let first_open = grid.get(first).map(is_open_or_study_hall).unwrap_or(true);
            let second_open = grid.get(second).map(is_open_or_study_hall).unwrap_or(true);
            if first_open && second_open {
                return Some((first, second));
            }
        }
    }
    None
}

/// Would vacating `donor` (setting it open) create a new back-to-back pair with
/// its neighbors, given that `target` is simultaneously being filled (so it no
/// longer counts as open)?
fn vacating_creates_new_pair(grid: &super::grid::TeacherGrid, donor: Slot, target: Slot) -> bool {
    let day = donor.day();
    let block = donor.block().0;

    let mut neighbors = Vec::with_capacity(2);
    if block > 1 {
        neighbors.push(Slot::new(day, Block(block - 1)));
    }
    if block < crate::types::BLOCKS_PER_DAY {
        neighbors.push(Slot::new(day, Block(block + 1)));
    }

    neighbors.into_iter().any(|n| {
        if n == target {
            return false;
        }
        grid.get(n).map(is_open_or_study_hall).unwrap_or(true)
    })
}

fn duplicate_subject_on_day(
    grade_grids: &GradeGrids,
    grade: &str,
    day: Day,
    exclude: &[Slot],
    subject: &str,
) -> bool {
    let Some(grid) = grade_grids.get(grade) else {
        return false;
    };
    Block::all().any(|block| {
        let slot = Slot::new(day, block);
        if exclude.contains(&slot) {
            return false;
        }
        grid.get(slot).map(|c| c.subject == subject).unwrap_or(false)
    })
}

/// Find the first taught cell elsewhere in this teacher's grid that may be
/// swapped into `target`, honoring all three §4.7 conditions.
fn find_swap_candidate(
    teacher_grid: &super::grid::TeacherGrid,
    grade_grids: &GradeGrids,
    target: Slot,
    grades: &[Grade],
    no_duplicate_subjects: bool,
) -> Option<(Slot, TeacherCell)> {
    for donor in Slot::all() {
        if donor == target {
            continue;
        }
        let Some(cell) = teacher_grid.get(donor) else {
            continue;
        };
        if is_open_or_study_hall(cell) {
            continue;
        }

        if vacating_creates_new_pair(teacher_grid, donor, target) {
            continue;
        }

        let concrete_grades = parse_grades(&cell.grade_display, grades);
        let grade_names: Vec<String> = concrete_grades.into_iter().map(|g| g.name).collect();

        let target_free = grade_names.iter().all(|g| {
            grade_grids
                .get(g)
                .map(|grid| grid.is_free(target))
                .unwrap_or(true)
        });
        if !target_free {
            continue;
        }

        if no_duplicate_subjects {
            let conflict = grade_names.iter().any(|g| {
                duplicate_subject_on_day(grade_grids, g, target.day(), &[target, donor], &cell.subject)
            });
            if conflict {
                continue;
            }
        }

        return Some((donor, cell.clone()));
    }
    None
}

fn apply_swap(
    teacher_grids: &mut TeacherGrids,
    grade_grids: &mut GradeGrids,
    teacher_name: &str,
    donor: Slot,
    target: Slot,
    cell: TeacherCell,
    grades: &[Grade],
) {
    let concrete_grades = parse_grades(&cell.grade_display, grades);

    if let Some(grid) = teacher_grids.get_mut(teacher_name) {
        grid.set(target, cell.clone());
        grid.set(donor, TeacherCell::open());
    }

    for g in concrete_grades {
        if let Some(grid) = grade_grids.get_mut(&g.name) {
            grid.clear(donor);
            grid.set(
                target,
                GradeCell {
                    teacher: teacher_name.to_string(),
                    subject: cell.subject.clone(),
                },
            );
        }
    }
}

/// Runs the redistribution pass in place. Returns the number of swaps made.
pub fn redistribute_open_blocks(
    teacher_grids: &mut TeacherGrids,
    grade_grids: &mut GradeGrids,
    teachers: &[Teacher],
    grades: &[Grade],
    rules: &RuleSet,
) -> u32 {
    if !rules.enabled(NO_BTB_OPEN) {
        return 0;
    }

    let no_duplicate_subjects = rules.enabled(NO_DUPLICATE_SUBJECTS);
    let mut swaps = 0u32;
    let mut iterations = 0u32;

    loop {
        if iterations >= MAX_REDISTRIBUTE_ITERATIONS {
            break;
        }

        let mut made_progress = false;

        for teacher in teachers {
            if !teacher.status.is_full_time() {
                continue;
            }
            let Some(grid) = teacher_grids.get(&teacher.name) else {
                continue;
            };
            let Some((_first, target)) = find_back_to_back_pair(grid) else {
                continue;
            };

            iterations += 1;
            if iterations > MAX_REDISTRIBUTE_ITERATIONS {
                break;
            }

            if let Some((donor, cell)) =
                find_swap_candidate(grid, grade_grids, target, grades, no_duplicate_subjects)
            {
                apply_swap(teacher_grids, grade_grids, &teacher.name, donor, target, cell, grades);
                swaps += 1;
                made_progress = true;
            }
        }

        if !made_progress {
            break;
        }
    }

    swaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schedule_builder::{empty_teacher_grids, rebuild_grade_grids};
    use crate::types::{RuleRecord, StudyHallEligibility, TeacherStatus};

    fn full_time(name: &str) -> Teacher {
        Teacher {
            name: name.to_string(),
            status: TeacherStatus::FullTime,
            can_supervise_study_hall: StudyHallEligibility::Eligible,
        }
    }

    fn vocab() -> Vec<Grade> {
        vec![
            Grade {
                name: "1st Grade".to_string(),
                sort_order: 1,
            },
            Grade {
                name: "2nd Grade".to_string(),
                sort_order: 2,
            },
        ]
    }

    #[test]
    fn swaps_a_taught_cell_into_the_back_to_back_gap() {
        let teachers = vec![full_time("T1")];
        let grades = vocab();
        let mut teacher_grids = empty_teacher_grids(&teachers);

        {
            let grid = teacher_grids.get_mut("T1").unwrap();
            grid.set(
                Slot::new(Day(0), Block(1)),
                TeacherCell {
                    grade_display: "1st Grade".to_string(),
                    subject: "Math".to_string(),
                },
            );
            grid.set(Slot::new(Day(0), Block(2)), TeacherCell::open());
            grid.set(Slot::new(Day(0), Block(3)), TeacherCell::open());
            grid.set(
                Slot::new(Day(0), Block(4)),
                TeacherCell {
                    grade_display: "1st Grade".to_string(),
                    subject: "Reading".to_string(),
                },
            );
            grid.set(
                Slot::new(Day(0), Block(5)),
                TeacherCell {
                    grade_display: "1st Grade".to_string(),
                    subject: "Science".to_string(),
                },
            );
        }

        let mut grade_grids = rebuild_grade_grids(&teacher_grids, &grades);
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);

        let swaps = redistribute_open_blocks(
            &mut teacher_grids,
            &mut grade_grids,
            &teachers,
            &grades,
            &rule_set,
        );

        assert!(swaps > 0);
        let grid = &teacher_grids["T1"];
        assert!(!grid.get(Slot::new(Day(0), Block(3))).unwrap().is_open());
    }

    #[test]
    fn disabled_rule_makes_no_changes() {
        let teachers = vec![full_time("T1")];
        let grades = vocab();
        let mut teacher_grids = empty_teacher_grids(&teachers);
        teacher_grids.get_mut("T1").unwrap().set(
            Slot::new(Day(0), Block(1)),
            TeacherCell {
                grade_display: "1st Grade".to_string(),
                subject: "Math".to_string(),
            },
        );
        let mut grade_grids = rebuild_grade_grids(&teacher_grids, &grades);
        let rules = vec![RuleRecord {
            rule_key: NO_BTB_OPEN.to_string(),
            enabled: false,
            config: None,
        }];
        let rule_set = RuleSet::new(&rules);

        let swaps = redistribute_open_blocks(
            &mut teacher_grids,
            &mut grade_grids,
            &teachers,
            &grades,
            &rule_set,
        );
        assert_eq!(swaps, 0);
    }
}
