//! Scorer & Diversity Filter (§4.8): scores each candidate (lower is better)
//! and keeps up to N survivors that pairwise differ in at least two teacher
//! rows, in ascending-score order.

use super::grid::{teacher_grid_fingerprint, TeacherGrids};
use super::output::ScheduleOption;
use crate::types::{Block, Day, Teacher};
use std::collections::HashSet;

/// `score = 100*(desiredStudyHalls - placed) + BTB + SPREAD` (§4.8).
pub fn score_candidate(desired_study_halls: usize, placed: usize, back_to_back: u32, spread_open: u32) -> i64 {
    100 * (desired_study_halls as i64 - placed as i64) + back_to_back as i64 + spread_open as i64
}

/// `SPREAD`: `sum(max(0, openCount(day) - 1))` per full-time teacher per day.
/// Decided in DESIGN.md (OQ4): Study Hall cells do not count as open here —
/// only the `OPEN` sentinel contributes to `openCount`.
pub fn spread_open_total(teachers: &[Teacher], grids: &TeacherGrids) -> u32 {
    let mut total = 0u32;
    for teacher in teachers {
        if !teacher.status.is_full_time() {
            continue;
        }
        let Some(grid) = grids.get(&teacher.name) else {
            continue;
        };
        for day in Day::all() {
            let open_count = Block::all()
                .filter(|&block| {
                    let slot = crate::types::Slot::new(day, block);
                    grid.get(slot).map(|c| c.is_open()).unwrap_or(true)
                })
                .count() as u32;
            total += open_count.saturating_sub(1);
        }
    }
    total
}

/// Two candidates are "too similar" iff fewer than two teachers differ,
/// compared as serialized teacher grids (§4.8).
fn differs_in_at_least_two_teachers(a: &TeacherGrids, b: &TeacherGrids) -> bool {
    let names: HashSet<&String> = a.keys().chain(b.keys()).collect();
    let mut differing = 0;
    for name in names {
        let fa = a.get(name).map(teacher_grid_fingerprint);
        let fb = b.get(name).map(teacher_grid_fingerprint);
        if fa != fb {
            differing += 1;
            if differing >= 2 {
                return true;
            }
        }
    }
    false
}

/// One scored, not-yet-filtered candidate (internal to the driver's attempt loop).
pub struct ScoredCandidate {
    pub score: i64,
    pub attempt: usize,
    pub option: ScheduleOption,
}

/// Accept candidates in ascending score (ties broken by attempt number, §5),
/// skipping any candidate too similar to an already-accepted one, until `n`
/// survivors are chosen or the list is exhausted.
pub fn filter_diverse(mut candidates: Vec<ScoredCandidate>, n: usize) -> Vec<ScheduleOption> {
    candidates.sort_by_key(|c| (c.score, c.attempt));

    let mut survivors: Vec<ScheduleOption> = Vec::new();
    for candidate in candidates {
        if survivors.len() >= n {
            break;
        }
        let too_similar = survivors
            .iter()
            .any(|s| !differs_in_at_least_two_teachers(&s.teacher_grids, &candidate.option.teacher_grids));
        if !too_similar {
            survivors.push(candidate.option);
        }
    }
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schedule_builder::empty_teacher_grids;
    use crate::engine::stats::TeacherStats;
    use crate::engine::study_hall::StudyHallAssignment;
    use crate::types::TeacherStatus;
    use std::collections::HashMap;

    fn teacher(name: &str) -> Teacher {
        Teacher {
            name: name.to_string(),
            status: TeacherStatus::FullTime,
            can_supervise_study_hall: Default::default(),
        }
    }

    fn option(option_number: usize, teachers: &[Teacher]) -> ScheduleOption {
        let grids = empty_teacher_grids(teachers);
        ScheduleOption {
            option_number,
            seed: option_number as u32,
            teacher_grids: grids,
            grade_grids: HashMap::new(),
            study_hall_assignments: Vec::<StudyHallAssignment>::new(),
            teacher_stats: HashMap::<String, TeacherStats>::new(),
            back_to_back_issues: 0,
            study_halls_placed: 0,
        }
    }

    #[test]
    fn score_rewards_study_halls_and_penalizes_issues() {
        assert_eq!(score_candidate(5, 5, 0, 0), 0);
        assert_eq!(score_candidate(5, 3, 2, 1), 203);
    }

    #[test]
    fn identical_grids_are_too_similar() {
        let teachers = vec![teacher("T1"), teacher("T2")];
        let candidates = vec![
            ScoredCandidate { score: 0, attempt: 0, option: option(1, &teachers) },
            ScoredCandidate { score: 1, attempt: 1, option: option(2, &teachers) },
        ];
        let survivors = filter_diverse(candidates, 3);
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn grades_empty_grid_still_counts_as_a_grid() {
        assert!(!differs_in_at_least_two_teachers(&HashMap::new(), &HashMap::new()));
    }
}
