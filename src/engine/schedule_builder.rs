//! Schedule Builder (§4.5): converts a flat session->slot assignment into the
//! teacher-grid view. The grade grid is never populated here directly — it is
//! always rebuilt from the teacher grid (§4.9 "Grade-grid freshness").

use super::grade_parser::parse_grades;
use super::grid::{GradeCell, GradeGrid, GradeGrids, TeacherCell, TeacherGrid, TeacherGrids};
use super::interner::Interner;
use super::session::{Session, SessionId};
use crate::types::{Grade, Slot, Teacher};
use std::collections::HashMap;

/// Pre-populate a dense grid of nulls for every teacher in the roster (§4.5: "Pre-populate
/// every (teacher, day, block) ... with null").
pub fn empty_teacher_grids(teachers: &[Teacher]) -> TeacherGrids {
    teachers
        .iter()
        .map(|t| (t.name.clone(), TeacherGrid::empty()))
        .collect()
}

/// Write each assigned session into its teacher's grid cell.
pub fn build_teacher_grids(
    sessions: &[Session],
    assignment: &HashMap<SessionId, Slot>,
    teachers: &[Teacher],
    interner: &Interner,
) -> TeacherGrids {
    let mut grids = empty_teacher_grids(teachers);

    for session in sessions {
        let Some(&slot) = assignment.get(&session.id) else {
            continue;
        };
        let teacher_name = interner.teacher_name(session.teacher).to_string();
        let subject_name = interner.subject_name(session.subject).to_string();
        let grid = grids.entry(teacher_name).or_insert_with(TeacherGrid::empty);
        grid.set(
            slot,
            TeacherCell {
                grade_display: session.grade_display.clone(),
                subject: subject_name,
            },
        );
    }

    grids
}

/// Rebuild the grade grid wholly from the teacher grid via the Grade Parser
/// (§4.5, §4.9, invariant I6/I9). Never incrementally patched.
pub fn rebuild_grade_grids(teacher_grids: &TeacherGrids, grades: &[Grade]) -> GradeGrids {
    let mut grade_grids: GradeGrids = grades
        .iter()
        .map(|g| (g.name.clone(), GradeGrid::empty()))
        .collect();

    for (teacher_name, grid) in teacher_grids {
        for (slot, cell) in grid.iter() {
            if cell.is_open() {
                continue;
            }
            for concrete in parse_grades(&cell.grade_display, grades) {
                if let Some(gg) = grade_grids.get_mut(&concrete.name) {
                    gg.set(
                        slot,
                        GradeCell {
                            teacher: teacher_name.clone(),
                            subject: cell.subject.clone(),
                        },
                    );
                }
            }
        }
    }

    grade_grids
}

/// Fill every teacher cell still `None` after the study-hall pass with the `OPEN`
/// sentinel (data-flow step between Study-Hall Placer and Redistributor).
pub fn fill_remaining_as_open(teacher_grids: &mut TeacherGrids) {
    for grid in teacher_grids.values_mut() {
        for i in 0..crate::engine::constants::GRID_SIZE as u8 {
            let slot = Slot(i);
            if grid.is_free(slot) {
                grid.set(slot, TeacherCell::open());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Day, Grade, Teacher, TeacherStatus};

    #[test]
    fn unassigned_teacher_cells_are_all_open_after_fill() {
        let teachers = vec![Teacher {
            name: "T1".to_string(),
            status: TeacherStatus::FullTime,
            can_supervise_study_hall: Default::default(),
        }];
        let mut grids = empty_teacher_grids(&teachers);
        grids
            .get_mut("T1")
            .unwrap()
            .set(Slot::new(Day(0), Block(1)), TeacherCell {
                grade_display: "1st Grade".to_string(),
                subject: "Math".to_string(),
            });
        fill_remaining_as_open(&mut grids);
        let grid = &grids["T1"];
        assert!(!grid.get(Slot::new(Day(0), Block(1))).unwrap().is_open());
        assert!(grid.get(Slot::new(Day(0), Block(2))).unwrap().is_open());
    }

    #[test]
    fn grade_grid_rebuild_projects_teacher_grid() {
        let teachers = vec![Teacher {
            name: "T1".to_string(),
            status: TeacherStatus::FullTime,
            can_supervise_study_hall: Default::default(),
        }];
        let grades = vec![Grade {
            name: "1st Grade".to_string(),
            sort_order: 1,
        }];
        let mut grids = empty_teacher_grids(&teachers);
        let slot = Slot::new(Day(0), Block(1));
        grids.get_mut("T1").unwrap().set(
            slot,
            TeacherCell {
                grade_display: "1st Grade".to_string(),
                subject: "Math".to_string(),
            },
        );
        let grade_grids = rebuild_grade_grids(&grids, &grades);
        let cell = grade_grids["1st Grade"].get(slot).unwrap();
        assert_eq!(cell.teacher, "T1");
        assert_eq!(cell.subject, "Math");
    }
}
