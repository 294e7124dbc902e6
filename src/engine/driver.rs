//! Top-level generation driver (§5, §7, §8 end-to-end scenarios): wires
//! Session Builder -> Solver -> Schedule Builder -> Study-Hall Placer ->
//! Redistributor -> Scorer -> Diversity Filter -> Stats into one generation
//! run, honoring the attempt loop, seed derivation, and diversity steering.

use super::grade_parser::parse_grades;
use super::progress::ProgressReporter;
use super::redistributor::redistribute_open_blocks;
use super::rng::Mulberry32;
use super::rules::RuleSet;
use super::schedule_builder::{build_teacher_grids, fill_remaining_as_open, rebuild_grade_grids};
use super::scorer::{filter_diverse, score_candidate, spread_open_total, ScoredCandidate};
use super::session::build_sessions;
use super::solver::{solve, AttemptOutcome, PrefilledGradeSlots, SolverInput};
use super::stats::{compute_teacher_stats, count_study_halls_placed, total_back_to_back_issues};
use super::study_hall::{place_study_halls, StudyHallGroup, StudyHallInput};
use crate::engine::interner::Interner;
use crate::engine::output::GenerationResult;
use crate::types::{Day, GenerationInput};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Build the study-hall group list from `study_hall_grades` config (§4.2). One
/// group per configured grade name; the legacy combinable-groups fallback is
/// not implemented (DESIGN.md OQ2).
fn configured_study_hall_groups(rules: &RuleSet) -> Vec<StudyHallGroup> {
    rules
        .study_hall_grades()
        .grades
        .into_iter()
        .map(|name| StudyHallGroup {
            grades: vec![name.clone()],
            name,
        })
        .collect()
}

/// Seed the solver's grade occupancy from locked teachers' frozen grids, and
/// derive the study-hall placer's refinement-mode context: which groups
/// already have a supervising slot locked in, and which days each grade
/// already has a study hall on.
struct LockedContext {
    prefilled_grade_slots: PrefilledGradeSlots,
    already_covered_groups: HashSet<String>,
    existing_grade_study_hall_days: HashMap<String, HashSet<Day>>,
}

fn build_locked_context(input: &GenerationInput, configured_groups: &[StudyHallGroup]) -> LockedContext {
    let mut prefilled: PrefilledGradeSlots = HashMap::new();
    let mut already_covered = HashSet::new();
    let mut existing_days: HashMap<String, HashSet<Day>> = HashMap::new();

    for grid in input.locked_teachers.values() {
        for (slot, cell) in grid.iter() {
            if cell.is_open() {
                continue;
            }
            let grades = parse_grades(&cell.grade_display, &input.grades);
            for grade in &grades {
                *prefilled.entry(grade.name.clone()).or_insert(0) |= 1u32 << slot.0;
            }
            if cell.is_study_hall() {
                for grade in &grades {
                    existing_days.entry(grade.name.clone()).or_default().insert(slot.day());
                }
                if let Some(group) = configured_groups.iter().find(|g| g.name == cell.grade_display) {
                    already_covered.insert(group.name.clone());
                }
            }
        }
    }

    LockedContext {
        prefilled_grade_slots: prefilled,
        already_covered_groups: already_covered,
        existing_grade_study_hall_days: existing_days,
    }
}

/// Run one full generation (§5 "single logical task"). Never mutates `input`.
pub fn generate(input: &GenerationInput, progress: &mut dyn ProgressReporter) -> GenerationResult {
    if input.grades.is_empty() {
        return GenerationResult::error("no grades provided");
    }

    let refinement_mode = !input.locked_teachers.is_empty();
    let classes: Vec<_> = input
        .classes
        .iter()
        .filter(|c| !input.locked_teachers.contains_key(&c.teacher))
        .cloned()
        .collect();

    let mut interner = Interner::new();
    let built = build_sessions(&classes, &mut interner);

    if built.sessions.is_empty() {
        return GenerationResult::error("no classes to schedule");
    }

    let rule_set = RuleSet::new(&input.rules);
    let configured_groups = configured_study_hall_groups(&rule_set);
    let desired_study_halls = configured_groups.len();
    let locked = build_locked_context(input, &configured_groups);

    let top_level_seed = input.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let num_attempts = input.config.num_attempts.max(1);

    let mut deprioritize: HashSet<crate::engine::interner::TeacherId> = HashSet::new();
    let mut candidates: Vec<ScoredCandidate> = Vec::new();
    let mut timeouts = 0usize;
    let mut infeasibles = 0usize;

    progress.on_init(num_attempts);
    tracing::info!(
        sessions = built.sessions.len(),
        groups = built.groups.len(),
        num_attempts,
        top_level_seed,
        refinement_mode,
        "starting generation run"
    );

    for attempt in 0..num_attempts {
        progress.on_attempt(attempt, num_attempts, "generating candidate schedule");
        let attempt_seed = Mulberry32::derive_attempt_seed(top_level_seed, attempt);
        tracing::debug!(attempt, attempt_seed, "starting attempt");

        progress.on_before_search();
        let outcome = solve(SolverInput {
            sessions: &built.sessions,
            groups: &built.groups,
            grades: &input.grades,
            rules: &rule_set,
            prefilled_grade_slots: &locked.prefilled_grade_slots,
            deprioritize_teachers: &deprioritize,
            max_time_ms: input.config.timeout_per_attempt_ms,
            max_iterations: crate::engine::constants::MAX_SEARCH_ITERATIONS,
            randomize: true,
            seed: attempt_seed,
        });

        let assignment = match outcome {
            AttemptOutcome::Optimal(assignment) => assignment,
            AttemptOutcome::Timeout => {
                tracing::warn!(attempt, attempt_seed, "attempt timed out");
                timeouts += 1;
                continue;
            }
            AttemptOutcome::Infeasible => {
                tracing::debug!(attempt, attempt_seed, "attempt infeasible");
                infeasibles += 1;
                continue;
            }
        };

        let mut teacher_grids = build_teacher_grids(&built.sessions, &assignment, &input.teachers, &interner);
        for (name, locked_grid) in &input.locked_teachers {
            teacher_grids.insert(name.clone(), locked_grid.clone());
        }

        let pre_study_hall_grade_grids = rebuild_grade_grids(&teacher_grids, &input.grades);
        let study_hall_result = place_study_halls(StudyHallInput {
            teacher_grids: &teacher_grids,
            grade_grids: &pre_study_hall_grade_grids,
            teachers: &input.teachers,
            rules: &rule_set,
            configured_groups: &configured_groups,
            already_covered_groups: &locked.already_covered_groups,
            existing_grade_study_hall_days: &locked.existing_grade_study_hall_days,
            required_teachers: &input.config.teachers_needing_study_halls,
            shuffle: true,
            seed: attempt_seed,
        });
        let mut teacher_grids = study_hall_result.teacher_grids;
        fill_remaining_as_open(&mut teacher_grids);

        let mut grade_grids = rebuild_grade_grids(&teacher_grids, &input.grades);
        redistribute_open_blocks(&mut teacher_grids, &mut grade_grids, &input.teachers, &input.grades, &rule_set);
        let grade_grids = rebuild_grade_grids(&teacher_grids, &input.grades);

        let teacher_stats = compute_teacher_stats(&input.teachers, &teacher_grids);
        let back_to_back_issues = total_back_to_back_issues(&teacher_stats);
        let placed = count_study_halls_placed(&study_hall_result.assignments);
        let spread = spread_open_total(&input.teachers, &teacher_grids);
        let score = score_candidate(desired_study_halls, placed, back_to_back_issues, spread);

        let option = crate::engine::output::ScheduleOption {
            option_number: 0,
            seed: attempt_seed,
            teacher_grids,
            grade_grids,
            study_hall_assignments: study_hall_result.assignments,
            teacher_stats,
            back_to_back_issues,
            study_halls_placed: placed,
        };

        // Diversity steering (§4.8 last paragraph): push ~30% of this
        // candidate's teachers onto the next attempt's deprioritized set, so
        // the ordering tree explores a different region.
        let mut rng = Mulberry32::new(attempt_seed ^ 0x5bd1_e995);
        for teacher in &input.teachers {
            if rng.next_f64() < 0.3 {
                if let Some(id) = interner.lookup(&teacher.name) {
                    deprioritize.insert(crate::engine::interner::TeacherId(id));
                }
            }
        }

        if placed < desired_study_halls {
            tracing::debug!(
                attempt,
                placed,
                desired_study_halls,
                "study-hall placement fell short of the configured groups"
            );
        }

        candidates.push(ScoredCandidate { score, attempt, option });
    }

    if candidates.is_empty() {
        tracing::warn!(timeouts, infeasibles, "no candidate survived the attempt loop");
        let message = if timeouts > 0 && infeasibles == 0 {
            "search timed out"
        } else {
            "constraints impossible"
        };
        let message = if refinement_mode {
            format!(
                "{message} (refinement mode: {} locked teachers, {} blocked grade-slots)",
                input.locked_teachers.len(),
                locked.prefilled_grade_slots.values().map(|m| m.count_ones()).sum::<u32>()
            )
        } else {
            message.to_string()
        };
        return GenerationResult::infeasible(message);
    }

    let mut survivors = filter_diverse(candidates, input.config.num_options.max(1));
    for (i, option) in survivors.iter_mut().enumerate() {
        option.option_number = i + 1;
    }

    tracing::info!(
        survivors = survivors.len(),
        timeouts,
        infeasibles,
        "generation run complete"
    );

    GenerationResult::success(survivors)
}
