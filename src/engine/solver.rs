//! Backtracking Solver (§4.4): places every session into a valid (day, block)
//! subject to teacher, grade, and same-day-duplicate-subject constraints.
//! Co-taught groups share a single slot. Supports seeded shuffling,
//! deprioritized teachers, prefilled (locked) grade slots, and a wall-clock
//! timeout.

use super::grade_parser::parse_grades;
use super::interner::{SubjectId, TeacherId};
use super::rng::Mulberry32;
use super::rules::{RuleSet, NO_DUPLICATE_SUBJECTS};
use super::session::{Group, GroupId, Session, SessionId};
use crate::engine::constants::MAX_SEARCH_ITERATIONS;
use crate::types::{Grade, Slot};
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum AttemptOutcome {
    Optimal(HashMap<SessionId, Slot>),
    Timeout,
    Infeasible,
}

/// Per-grade bitmask of already-occupied slots, seeded from locked teacher rows
/// in refinement mode (§4.4, §6 "lockedTeachers").
pub type PrefilledGradeSlots = HashMap<String, u32>;

pub struct SolverInput<'a> {
    pub sessions: &'a [Session],
    pub groups: &'a [Group],
    pub grades: &'a [Grade],
    pub rules: &'a RuleSet<'a>,
    pub prefilled_grade_slots: &'a PrefilledGradeSlots,
    pub deprioritize_teachers: &'a HashSet<TeacherId>,
    pub max_time_ms: u64,
    pub max_iterations: u64,
    pub randomize: bool,
    pub seed: u32,
}

struct SolverCtx<'a> {
    no_duplicate_subjects: bool,
    resolved_grades: HashMap<String, Vec<String>>,
    deprioritize: &'a HashSet<TeacherId>,
    groups: &'a [Group],
    sessions_by_id: HashMap<SessionId, &'a Session>,
}

struct SolverState {
    assignment: HashMap<SessionId, Slot>,
    teacher_occupancy: HashMap<TeacherId, u32>,
    grade_occupancy: HashMap<String, u32>,
    grade_subject_days: HashMap<(String, SubjectId), u8>,
    placed_groups: HashSet<GroupId>,
}

enum SearchResult {
    Found,
    NotFound,
    Stopped,
}

fn bit(slot: Slot) -> u32 {
    1u32 << slot.0
}

fn day_bit(slot: Slot) -> u8 {
    1u8 << slot.day().0
}

impl SolverState {
    fn new(prefilled: &PrefilledGradeSlots) -> Self {
        Self {
            assignment: HashMap::new(),
            teacher_occupancy: HashMap::new(),
            grade_occupancy: prefilled.clone(),
            grade_subject_days: HashMap::new(),
            placed_groups: HashSet::new(),
        }
    }

    fn teacher_free(&self, teacher: TeacherId, slot: Slot) -> bool {
        self.teacher_occupancy.get(&teacher).copied().unwrap_or(0) & bit(slot) == 0
    }

    fn grades_free(&self, grades: &[String], slot: Slot) -> bool {
        grades
            .iter()
            .all(|g| self.grade_occupancy.get(g).copied().unwrap_or(0) & bit(slot) == 0)
    }

    fn no_duplicate_subject_on_day(&self, grades: &[String], subject: SubjectId, slot: Slot) -> bool {
        grades.iter().all(|g| {
            self.grade_subject_days
                .get(&(g.clone(), subject))
                .copied()
                .unwrap_or(0)
                & day_bit(slot)
                == 0
        })
    }

    fn place(&mut self, teacher: TeacherId, grades: &[String], subject: SubjectId, slot: Slot) {
        *self.teacher_occupancy.entry(teacher).or_insert(0) |= bit(slot);
        for g in grades {
            *self.grade_occupancy.entry(g.clone()).or_insert(0) |= bit(slot);
            *self
                .grade_subject_days
                .entry((g.clone(), subject))
                .or_insert(0) |= day_bit(slot);
        }
    }

    fn unplace(&mut self, teacher: TeacherId, grades: &[String], subject: SubjectId, slot: Slot) {
        if let Some(m) = self.teacher_occupancy.get_mut(&teacher) {
            *m &= !bit(slot);
        }
        for g in grades {
            if let Some(m) = self.grade_occupancy.get_mut(g) {
                *m &= !bit(slot);
            }
            if let Some(m) = self.grade_subject_days.get_mut(&(g.clone(), subject)) {
                *m &= !day_bit(slot);
            }
        }
    }
}

/// Candidate slots for a single (non-co-taught) session.
fn candidates_for_single<'a>(
    session: &'a Session,
    state: &SolverState,
    ctx: &SolverCtx,
) -> Vec<Slot> {
    let grades = ctx
        .resolved_grades
        .get(&session.grade_display)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    session
        .valid_slots
        .iter()
        .copied()
        .filter(|&slot| {
            state.teacher_free(session.teacher, slot)
                && state.grades_free(grades, slot)
                && (!ctx.no_duplicate_subjects
                    || state.no_duplicate_subject_on_day(grades, session.subject, slot))
        })
        .collect()
}

/// Candidate slots for a co-taught group: valid for every member simultaneously.
fn candidates_for_group(group: &Group, state: &SolverState, ctx: &SolverCtx) -> Vec<Slot> {
    let members: Vec<&Session> = group
        .sessions
        .iter()
        .map(|id| ctx.sessions_by_id[id])
        .collect();

    let Some(first) = members.first() else {
        return Vec::new();
    };
    let grades = ctx
        .resolved_grades
        .get(&first.grade_display)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    // Intersection of every member's valid_slots, as declared in §4.4 (i).
    let mut candidate: Vec<Slot> = first.valid_slots.clone();
    for m in &members[1..] {
        let set: HashSet<Slot> = m.valid_slots.iter().copied().collect();
        candidate.retain(|s| set.contains(s));
    }

    candidate
        .into_iter()
        .filter(|&slot| {
            members.iter().all(|m| state.teacher_free(m.teacher, slot))
                && state.grades_free(grades, slot)
                && (!ctx.no_duplicate_subjects
                    || state.no_duplicate_subject_on_day(grades, first.subject, slot))
        })
        .collect()
}

fn place_single(session: &Session, slot: Slot, state: &mut SolverState, ctx: &SolverCtx) {
    let grades = ctx
        .resolved_grades
        .get(&session.grade_display)
        .cloned()
        .unwrap_or_default();
    state.place(session.teacher, &grades, session.subject, slot);
    state.assignment.insert(session.id, slot);
}

fn unplace_single(session: &Session, slot: Slot, state: &mut SolverState, ctx: &SolverCtx) {
    let grades = ctx
        .resolved_grades
        .get(&session.grade_display)
        .cloned()
        .unwrap_or_default();
    state.unplace(session.teacher, &grades, session.subject, slot);
    state.assignment.remove(&session.id);
}

fn place_group(group: &Group, slot: Slot, state: &mut SolverState, ctx: &SolverCtx) {
    let members: Vec<&Session> = group
        .sessions
        .iter()
        .map(|id| ctx.sessions_by_id[id])
        .collect();
    let grades = members
        .first()
        .and_then(|m| ctx.resolved_grades.get(&m.grade_display))
        .cloned()
        .unwrap_or_default();
    for m in &members {
        state.place(m.teacher, &grades, m.subject, slot);
        state.assignment.insert(m.id, slot);
    }
    state.placed_groups.insert(group.id);
}

fn unplace_group(group: &Group, slot: Slot, state: &mut SolverState, ctx: &SolverCtx) {
    let members: Vec<&Session> = group
        .sessions
        .iter()
        .map(|id| ctx.sessions_by_id[id])
        .collect();
    let grades = members
        .first()
        .and_then(|m| ctx.resolved_grades.get(&m.grade_display))
        .cloned()
        .unwrap_or_default();
    for m in &members {
        state.unplace(m.teacher, &grades, m.subject, slot);
        state.assignment.remove(&m.id);
    }
    state.placed_groups.remove(&group.id);
}

struct Budget {
    deadline: Instant,
    max_iterations: u64,
    iterations: u64,
}

impl Budget {
    fn tick(&mut self) -> bool {
        self.iterations += 1;
        self.iterations <= self.max_iterations && Instant::now() < self.deadline
    }
}

#[allow(clippy::too_many_arguments)]
fn backtrack(
    order: &[usize],
    pos: usize,
    sessions: &[Session],
    state: &mut SolverState,
    ctx: &SolverCtx,
    rng: &mut Option<Mulberry32>,
    budget: &mut Budget,
) -> SearchResult {
    if pos == order.len() {
        return SearchResult::Found;
    }

    let session = &sessions[order[pos]];

    if state.assignment.contains_key(&session.id) {
        return backtrack(order, pos + 1, sessions, state, ctx, rng, budget);
    }

    if let Some(group_id) = session.cotaught_group {
        if state.placed_groups.contains(&group_id) {
            return backtrack(order, pos + 1, sessions, state, ctx, rng, budget);
        }
        let group = &ctx.groups[group_id.0 as usize];
        let mut candidates = candidates_for_group(group, state, ctx);
        if let Some(rng) = rng.as_mut() {
            candidates.shuffle(rng);
        }

        for slot in candidates {
            if !budget.tick() {
                return SearchResult::Stopped;
            }
            place_group(group, slot, state, ctx);
            match backtrack(order, pos + 1, sessions, state, ctx, rng, budget) {
                SearchResult::Found => return SearchResult::Found,
                SearchResult::Stopped => return SearchResult::Stopped,
                SearchResult::NotFound => unplace_group(group, slot, state, ctx),
            }
        }
        SearchResult::NotFound
    } else {
        let mut candidates = candidates_for_single(session, state, ctx);
        if let Some(rng) = rng.as_mut() {
            candidates.shuffle(rng);
        }

        for slot in candidates {
            if !budget.tick() {
                return SearchResult::Stopped;
            }
            place_single(session, slot, state, ctx);
            match backtrack(order, pos + 1, sessions, state, ctx, rng, budget) {
                SearchResult::Found => return SearchResult::Found,
                SearchResult::Stopped => return SearchResult::Stopped,
                SearchResult::NotFound => unplace_single(session, slot, state, ctx),
            }
        }
        SearchResult::NotFound
    }
}

/// Composite ordering key (§4.4): `(isFixed desc, deprioritized asc, validSlots.len() asc)`,
/// an MRV-style ordering with fixed sessions placed first.
fn ordering_key(session: &Session, deprioritize: &HashSet<TeacherId>) -> (i8, i8, usize) {
    let is_fixed_desc = if session.is_fixed { 0 } else { 1 };
    let deprioritized_asc = if deprioritize.contains(&session.teacher) {
        1
    } else {
        0
    };
    (is_fixed_desc, deprioritized_asc, session.valid_slots.len())
}

pub fn solve(input: SolverInput) -> AttemptOutcome {
    let resolved_grades: HashMap<String, Vec<String>> = input
        .sessions
        .iter()
        .map(|s| s.grade_display.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .map(|gd| {
            let names = parse_grades(&gd, input.grades)
                .into_iter()
                .map(|g| g.name)
                .collect();
            (gd, names)
        })
        .collect();

    let sessions_by_id: HashMap<SessionId, &Session> =
        input.sessions.iter().map(|s| (s.id, s)).collect();

    let ctx = SolverCtx {
        no_duplicate_subjects: input.rules.enabled(NO_DUPLICATE_SUBJECTS),
        resolved_grades,
        deprioritize: input.deprioritize_teachers,
        groups: input.groups,
        sessions_by_id,
    };

    let mut order: Vec<usize> = (0..input.sessions.len()).collect();
    order.sort_by_key(|&i| ordering_key(&input.sessions[i], ctx.deprioritize));

    let mut state = SolverState::new(input.prefilled_grade_slots);
    let mut rng = if input.randomize {
        Some(Mulberry32::new(input.seed))
    } else {
        None
    };
    let mut budget = Budget {
        deadline: Instant::now() + Duration::from_millis(input.max_time_ms),
        max_iterations: input.max_iterations.min(MAX_SEARCH_ITERATIONS),
        iterations: 0,
    };

    match backtrack(
        &order,
        0,
        input.sessions,
        &mut state,
        &ctx,
        &mut rng,
        &mut budget,
    ) {
        SearchResult::Found => AttemptOutcome::Optimal(state.assignment),
        SearchResult::Stopped => AttemptOutcome::Timeout,
        SearchResult::NotFound => AttemptOutcome::Infeasible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::interner::Interner;
    use crate::engine::session::build_sessions;
    use crate::types::{Block, Class, Day, Grade, RuleRecord};

    fn vocab() -> Vec<Grade> {
        let mut v = vec![Grade {
            name: "Kindergarten".to_string(),
            sort_order: 0,
        }];
        for n in 1..=11u8 {
            v.push(Grade {
                name: format!("{}th Grade", n),
                sort_order: n,
            });
        }
        v
    }

    fn class(teacher: &str, grade_display: &str, subject: &str, days: u8) -> Class {
        Class {
            teacher: teacher.to_string(),
            grade_display: grade_display.to_string(),
            grades: vec![],
            subject: subject.to_string(),
            days_per_week: days,
            is_elective: false,
            available_days: None,
            available_blocks: None,
            fixed_slots: vec![],
        }
    }

    fn solve_classes(classes: &[Class]) -> AttemptOutcome {
        let mut interner = Interner::new();
        let built = build_sessions(classes, &mut interner);
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let grades = vocab();
        let prefilled = HashMap::new();
        let deprioritize = HashSet::new();
        solve(SolverInput {
            sessions: &built.sessions,
            groups: &built.groups,
            grades: &grades,
            rules: &rule_set,
            prefilled_grade_slots: &prefilled,
            deprioritize_teachers: &deprioritize,
            max_time_ms: 5_000,
            max_iterations: 100_000,
            randomize: false,
            seed: 1,
        })
    }

    #[test]
    fn trivial_single_class_solves() {
        let classes = vec![class("T1", "1st Grade", "Math", 3)];
        match solve_classes(&classes) {
            AttemptOutcome::Optimal(assignment) => assert_eq!(assignment.len(), 3),
            other => panic!("expected Optimal, got {other:?}"),
        }
    }

    #[test]
    fn fixed_slots_are_honored() {
        let mut c = class("T1", "2nd Grade", "Art", 0);
        c.fixed_slots = vec![(Day(0), Block(1)), (Day(2), Block(1))];
        match solve_classes(&[c]) {
            AttemptOutcome::Optimal(assignment) => {
                let slots: HashSet<Slot> = assignment.values().copied().collect();
                assert!(slots.contains(&Slot::new(Day(0), Block(1))));
                assert!(slots.contains(&Slot::new(Day(2), Block(1))));
            }
            other => panic!("expected Optimal, got {other:?}"),
        }
    }

    #[test]
    fn cotaught_sessions_share_a_slot() {
        let mut interner = Interner::new();
        let classes = vec![
            class("T1", "6th-7th Grade", "Science", 3),
            class("T2", "6th-7th Grade", "Science", 3),
        ];
        let built = build_sessions(&classes, &mut interner);
        let rules: Vec<RuleRecord> = vec![];
        let rule_set = RuleSet::new(&rules);
        let grades = vocab();
        let prefilled = HashMap::new();
        let deprioritize = HashSet::new();
        let outcome = solve(SolverInput {
            sessions: &built.sessions,
            groups: &built.groups,
            grades: &grades,
            rules: &rule_set,
            prefilled_grade_slots: &prefilled,
            deprioritize_teachers: &deprioritize,
            max_time_ms: 5_000,
            max_iterations: 100_000,
            randomize: false,
            seed: 1,
        });
        match outcome {
            AttemptOutcome::Optimal(assignment) => {
                for group in &built.groups {
                    let slots: HashSet<Slot> =
                        group.sessions.iter().map(|id| assignment[id]).collect();
                    assert_eq!(slots.len(), 1, "co-taught group must share one slot");
                }
            }
            other => panic!("expected Optimal, got {other:?}"),
        }
    }

    #[test]
    fn overconstrained_single_day_is_infeasible() {
        let classes = vec![
            class("T", "3rd Grade", "Reading", 5),
            class("T", "4th Grade", "Reading", 5),
            {
                let mut c = class("T", "5th Grade", "Reading", 5);
                c.available_days = Some(vec![Day(0)]);
                c
            },
        ];
        match solve_classes(&classes) {
            AttemptOutcome::Infeasible => {}
            other => panic!("expected Infeasible, got {other:?}"),
        }
    }
}
