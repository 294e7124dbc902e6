//! Study-Hall Placer (§4.6): for each configured study-hall grade, finds an
//! (eligible teacher, day, block) where every participating grade is free and
//! none of those grades already has a study hall that day.

use super::grid::{GradeGrids, TeacherCell, TeacherGrids};
use super::rng::Mulberry32;
use super::rules::{RuleSet, STUDY_HALL_DISTRIBUTION};
use crate::types::{Day, Slot, Teacher, TeacherStatus};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One grade's study-hall placement request. `grades` holds the concrete
/// grades that must all be free at the accepted slot — always a single
/// grade here, since the combinable-groups fallback is not implemented
/// (see DESIGN.md, OQ2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyHallGroup {
    pub name: String,
    pub grades: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyHallAssignment {
    pub group: String,
    pub teacher: Option<String>,
    pub day: Option<Day>,
    pub block: Option<crate::types::Block>,
}

impl StudyHallAssignment {
    fn unplaced(group: &str) -> Self {
        Self {
            group: group.to_string(),
            teacher: None,
            day: None,
            block: None,
        }
    }
}

pub struct StudyHallInput<'a> {
    pub teacher_grids: &'a TeacherGrids,
    pub grade_grids: &'a GradeGrids,
    pub teachers: &'a [Teacher],
    pub rules: &'a RuleSet<'a>,
    pub configured_groups: &'a [StudyHallGroup],
    pub already_covered_groups: &'a HashSet<String>,
    pub existing_grade_study_hall_days: &'a HashMap<String, HashSet<Day>>,
    pub required_teachers: &'a [String],
    pub shuffle: bool,
    pub seed: u32,
}

pub struct StudyHallResult {
    pub teacher_grids: TeacherGrids,
    pub assignments: Vec<StudyHallAssignment>,
}

fn eligible_teacher_names(teachers: &[Teacher], rules: &RuleSet) -> Vec<String> {
    let eligibility = rules.study_hall_teacher_eligibility();
    teachers
        .iter()
        .filter(|t| {
            t.is_study_hall_eligible()
                && match t.status {
                    TeacherStatus::FullTime => eligibility.allow_full_time,
                    TeacherStatus::PartTime => eligibility.allow_part_time,
                }
        })
        .map(|t| t.name.clone())
        .collect()
}

fn teaching_count(name: &str, grids: &TeacherGrids) -> usize {
    grids.get(name).map(|g| g.iter().count()).unwrap_or(0)
}

/// Order eligible teachers per §4.6's base rule (ascending teaching count,
/// original-roster order breaking ties) then apply the `seed mod 10` mixing
/// strategy when shuffling is requested. `strategy` must be `seed mod 10` —
/// the same value that gates the group-reshuffle decision in
/// `place_study_halls`, so the "7-9: fully random plus more aggressive group
/// reshuffling" bucket in §4.6 stays tied to one value instead of a fresh,
/// independent RNG draw.
fn order_teachers(
    names: &[String],
    grids: &TeacherGrids,
    shuffle: bool,
    strategy: usize,
    rng: &mut Mulberry32,
) -> Vec<String> {
    let mut by_count: Vec<(usize, String)> = names
        .iter()
        .map(|n| (teaching_count(n, grids), n.clone()))
        .collect();
    by_count.sort_by_key(|(count, _)| *count);

    if !shuffle {
        return by_count.into_iter().map(|(_, n)| n).collect();
    }

    match strategy {
        0..=2 | 3..=4 => {
            // Bucket by equal load, shuffle within each bucket, then order the
            // buckets ascending (0-2) or descending (3-4) by load.
            let mut buckets: Vec<(usize, Vec<String>)> = Vec::new();
            for (count, name) in by_count {
                if let Some(last) = buckets.last_mut() {
                    if last.0 == count {
                        last.1.push(name);
                        continue;
                    }
                }
                buckets.push((count, vec![name]));
            }
            for (_, bucket) in buckets.iter_mut() {
                bucket.shuffle(rng);
            }
            if strategy >= 3 {
                buckets.reverse();
            }
            buckets.into_iter().flat_map(|(_, b)| b).collect()
        }
        _ => {
            // 5-9: fully random ordering, irrespective of load.
            let mut all: Vec<String> = by_count.into_iter().map(|(_, n)| n).collect();
            all.shuffle(rng);
            all
        }
    }
}

fn slot_order(shuffle: bool, rng: &mut Mulberry32) -> Vec<Slot> {
    let mut slots: Vec<Slot> = Slot::all().collect();
    if shuffle {
        slots.shuffle(rng);
    }
    slots
}

/// A placement is accepted only when the supervising teacher's cell is free,
/// every participating grade's cell is free in the grade grid (§4.6 / I5 /
/// P8) — checked against both the pre-existing grade grid and any grade+slot
/// already claimed by a study hall placed earlier in this same pass — and
/// none of those grades already has a study hall on that day.
fn try_place(
    group: &StudyHallGroup,
    teacher: &str,
    slot: Slot,
    grids: &TeacherGrids,
    grade_grids: &GradeGrids,
    reserved_grade_slots: &HashSet<(String, Slot)>,
    used_days: &HashMap<String, HashSet<Day>>,
) -> bool {
    let Some(grid) = grids.get(teacher) else {
        return false;
    };
    if !grid.is_free(slot) {
        return false;
    }
    group.grades.iter().all(|g| {
        let grade_free = grade_grids.get(g).map(|gg| gg.is_free(slot)).unwrap_or(true)
            && !reserved_grade_slots.contains(&(g.clone(), slot));
        grade_free
            && used_days
                .get(g)
                .map(|days| !days.contains(&slot.day()))
                .unwrap_or(true)
    })
}

pub fn place_study_halls(input: StudyHallInput) -> StudyHallResult {
    let mut grids = input.teacher_grids.clone();
    let mut assignments = Vec::new();

    if !input.rules.enabled(STUDY_HALL_DISTRIBUTION) || input.configured_groups.is_empty() {
        for g in input.configured_groups {
            assignments.push(StudyHallAssignment::unplaced(&g.name));
        }
        return StudyHallResult {
            teacher_grids: grids,
            assignments,
        };
    }

    let mut remaining: Vec<StudyHallGroup> = input
        .configured_groups
        .iter()
        .filter(|g| !input.already_covered_groups.contains(&g.name))
        .cloned()
        .collect();

    let eligible = eligible_teacher_names(input.teachers, input.rules);
    if eligible.is_empty() {
        for g in &remaining {
            assignments.push(StudyHallAssignment::unplaced(&g.name));
        }
        return StudyHallResult {
            teacher_grids: grids,
            assignments,
        };
    }

    let mut used_days: HashMap<String, HashSet<Day>> = input.existing_grade_study_hall_days.clone();
    let mut reserved_grade_slots: HashSet<(String, Slot)> = HashSet::new();
    let mut rng = Mulberry32::new(input.seed);
    // §4.6: the mixing strategy is chosen by `seed mod 10`, and the "7-9"
    // bucket's "more aggressive group reshuffling" must be the same draw
    // that picked the fully-random teacher ordering below, not an
    // independent one.
    let strategy = (input.seed % 10) as usize;
    let mut teacher_order = order_teachers(&eligible, &grids, input.shuffle, strategy, &mut rng);
    let slots = slot_order(input.shuffle, &mut rng);

    if input.shuffle && strategy >= 7 {
        remaining.shuffle(&mut rng);
    }

    // Phase 1: forced re-placement for teachers who must keep a study hall.
    for required in input.required_teachers {
        if !eligible.contains(required) {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|g| {
            slots.iter().any(|&slot| {
                try_place(g, required, slot, &grids, input.grade_grids, &reserved_grade_slots, &used_days)
            })
        }) {
            let slot = slots
                .iter()
                .copied()
                .find(|&slot| {
                    try_place(
                        &remaining[pos],
                        required,
                        slot,
                        &grids,
                        input.grade_grids,
                        &reserved_grade_slots,
                        &used_days,
                    )
                })
                .expect("position search already confirmed a slot exists");
            let group = remaining.remove(pos);
            place(
                &mut grids,
                &mut used_days,
                &mut reserved_grade_slots,
                &mut assignments,
                &group,
                required,
                slot,
            );
            teacher_order.retain(|t| t != required);
        }
    }

    // Phase 2: place every remaining group against the ordered teacher/slot lists.
    for group in remaining {
        let placement = teacher_order.iter().find_map(|teacher| {
            slots
                .iter()
                .copied()
                .find(|&slot| {
                    try_place(&group, teacher, slot, &grids, input.grade_grids, &reserved_grade_slots, &used_days)
                })
                .map(|slot| (teacher.clone(), slot))
        });

        match placement {
            Some((teacher, slot)) => {
                place(
                    &mut grids,
                    &mut used_days,
                    &mut reserved_grade_slots,
                    &mut assignments,
                    &group,
                    &teacher,
                    slot,
                );
            }
            None => {
                tracing::debug!(group = %group.name, "study-hall group could not be placed");
                assignments.push(StudyHallAssignment::unplaced(&group.name));
            }
        }
    }

    StudyHallResult {
        teacher_grids: grids,
        assignments,
    }
}

fn place(
    grids: &mut TeacherGrids,
    used_days: &mut HashMap<String, HashSet<Day>>,
    reserved_grade_slots: &mut HashSet<(String, Slot)>,
    assignments: &mut Vec<StudyHallAssignment>,
    group: &StudyHallGroup,
    teacher: &str,
    slot: Slot,
) {
    if let Some(grid) = grids.get_mut(teacher) {
        grid.set(slot, TeacherCell::study_hall(group.name.clone()));
    }
    for g in &group.grades {
        used_days.entry(g.clone()).or_default().insert(slot.day());
        reserved_grade_slots.insert((g.clone(), slot));
    }
    assignments.push(StudyHallAssignment {
        group: group.name.clone(),
        teacher: Some(teacher.to_string()),
        day: Some(slot.day()),
        block: Some(slot.block()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schedule_builder::empty_teacher_grids;
    use crate::types::{RuleRecord, StudyHallEligibility};

    fn teacher(name: &str, status: TeacherStatus) -> Teacher {
        Teacher {
            name: name.to_string(),
            status,
            can_supervise_study_hall: StudyHallEligibility::Eligible,
        }
    }

    #[test]
    fn places_into_first_free_slot_when_no_shuffle() {
        let teachers = vec![teacher("T1", TeacherStatus::FullTime)];
        let grids = empty_teacher_grids(&teachers);
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let groups = vec![StudyHallGroup {
            name: "1st Grade".to_string(),
            grades: vec!["1st Grade".to_string()],
        }];
        let already_covered = HashSet::new();
        let existing_days = HashMap::new();
        let required = Vec::new();

        let grade_grids: GradeGrids = HashMap::new();
        let result = place_study_halls(StudyHallInput {
            teacher_grids: &grids,
            grade_grids: &grade_grids,
            teachers: &teachers,
            rules: &rule_set,
            configured_groups: &groups,
            already_covered_groups: &already_covered,
            existing_grade_study_hall_days: &existing_days,
            required_teachers: &required,
            shuffle: false,
            seed: 0,
        });

        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].teacher.as_deref(), Some("T1"));
        assert_eq!(result.assignments[0].day, Some(Day(0)));
    }

    #[test]
    fn no_eligible_teachers_marks_all_unplaced() {
        let teachers = vec![teacher("T1", TeacherStatus::PartTime)];
        let grids = empty_teacher_grids(&teachers);
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let groups = vec![StudyHallGroup {
            name: "2nd Grade".to_string(),
            grades: vec!["2nd Grade".to_string()],
        }];
        let already_covered = HashSet::new();
        let existing_days = HashMap::new();
        let required = Vec::new();

        let grade_grids: GradeGrids = HashMap::new();
        let result = place_study_halls(StudyHallInput {
            teacher_grids: &grids,
            grade_grids: &grade_grids,
            teachers: &teachers,
            rules: &rule_set,
            configured_groups: &groups,
            already_covered_groups: &already_covered,
            existing_grade_study_hall_days: &existing_days,
            required_teachers: &required,
            shuffle: false,
            seed: 0,
        });

        assert_eq!(result.assignments.len(), 1);
        assert!(result.assignments[0].teacher.is_none());
    }

    #[test]
    fn already_covered_groups_are_skipped() {
        let teachers = vec![teacher("T1", TeacherStatus::FullTime)];
        let grids = empty_teacher_grids(&teachers);
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let groups = vec![StudyHallGroup {
            name: "3rd Grade".to_string(),
            grades: vec!["3rd Grade".to_string()],
        }];
        let mut already_covered = HashSet::new();
        already_covered.insert("3rd Grade".to_string());
        let existing_days = HashMap::new();
        let required = Vec::new();

        let grade_grids: GradeGrids = HashMap::new();
        let result = place_study_halls(StudyHallInput {
            teacher_grids: &grids,
            grade_grids: &grade_grids,
            teachers: &teachers,
            rules: &rule_set,
            configured_groups: &groups,
            already_covered_groups: &already_covered,
            existing_grade_study_hall_days: &existing_days,
            required_teachers: &required,
            shuffle: false,
            seed: 0,
        });

        assert!(result.assignments.is_empty());
    }

    #[test]
    fn required_teacher_is_placed_in_phase_one() {
        let teachers = vec![
            teacher("Busy", TeacherStatus::FullTime),
            teacher("Idle", TeacherStatus::FullTime),
        ];
        let mut grids = empty_teacher_grids(&teachers);
        for i in 0..5u8 {
            grids
                .get_mut("Busy")
                .unwrap()
                .set(Slot(i), TeacherCell::open());
        }
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let groups = vec![StudyHallGroup {
            name: "4th Grade".to_string(),
            grades: vec!["4th Grade".to_string()],
        }];
        let already_covered = HashSet::new();
        let existing_days = HashMap::new();
        let required = vec!["Idle".to_string()];

        let grade_grids: GradeGrids = HashMap::new();
        let result = place_study_halls(StudyHallInput {
            teacher_grids: &grids,
            grade_grids: &grade_grids,
            teachers: &teachers,
            rules: &rule_set,
            configured_groups: &groups,
            already_covered_groups: &already_covered,
            existing_grade_study_hall_days: &existing_days,
            required_teachers: &required,
            shuffle: false,
            seed: 0,
        });

        assert_eq!(result.assignments[0].teacher.as_deref(), Some("Idle"));
    }

    #[test]
    fn skips_slot_where_grade_is_already_busy() {
        // T1 teaches 6th Grade at (Mon, block 0). An idle T2 is eligible for
        // study-hall supervision. Without consulting the grade grid, the
        // placer would happily put a 6th-Grade study hall at the same slot
        // under T2, double-booking the grade even though both teacher grids
        // look locally free.
        let teachers = vec![
            teacher("T1", TeacherStatus::FullTime),
            teacher("T2", TeacherStatus::FullTime),
        ];
        let mut grids = empty_teacher_grids(&teachers);
        let busy_slot = Slot(0);
        grids.get_mut("T1").unwrap().set(
            busy_slot,
            TeacherCell {
                subject: "Math".to_string(),
                grade_display: "6th Grade".to_string(),
            },
        );
        for i in 1..5u8 {
            grids.get_mut("T1").unwrap().set(Slot(i), TeacherCell::open());
        }

        let mut grade_grid = crate::engine::grid::GradeGrid::empty();
        grade_grid.set(
            busy_slot,
            crate::engine::grid::GradeCell {
                teacher: "T1".to_string(),
                subject: "Math".to_string(),
            },
        );
        let mut grade_grids: GradeGrids = HashMap::new();
        grade_grids.insert("6th Grade".to_string(), grade_grid);

        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let groups = vec![StudyHallGroup {
            name: "6th Grade".to_string(),
            grades: vec!["6th Grade".to_string()],
        }];
        let already_covered = HashSet::new();
        let existing_days = HashMap::new();
        let required = Vec::new();

        let result = place_study_halls(StudyHallInput {
            teacher_grids: &grids,
            grade_grids: &grade_grids,
            teachers: &teachers,
            rules: &rule_set,
            configured_groups: &groups,
            already_covered_groups: &already_covered,
            existing_grade_study_hall_days: &existing_days,
            required_teachers: &required,
            shuffle: false,
            seed: 0,
        });

        assert_eq!(result.assignments.len(), 1);
        assert_ne!(
            result.assignments[0].day.zip(result.assignments[0].block),
            Some((busy_slot.day(), busy_slot.block()))
        );
    }
}
