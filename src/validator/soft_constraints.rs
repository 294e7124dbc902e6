//! Soft scoring (§4.8 scorer, §4.9 stats): the same weighted score the engine
//! uses to rank candidates, re-exposed here so the CLI's `verify` subcommand
//! can show it alongside the hard-invariant check.

use crate::engine::output::ScheduleOption;
use crate::engine::scorer::score_candidate;
use crate::validator::SoftScore;

/// `100*(desired - placed) + backToBack + spreadOpen`, lower is better (§4.8).
/// Exposed as a "soft score" out of an implied ceiling so low-is-bad is legible
/// on a 0-100 scale: a perfect option (no deficit, no back-to-back, no spread) scores 100.
pub fn score_option(option: &ScheduleOption, desired_study_halls: usize) -> SoftScore {
    let raw = score_candidate(
        desired_study_halls,
        option.study_halls_placed,
        option.back_to_back_issues,
        0,
    );

    let score = 100.0 - raw as f64;
    SoftScore {
        constraint: "GenerationScore".to_string(),
        score: score.max(0.0),
        max_score: 100.0,
        details: format!(
            "{} study hall(s) placed of {desired_study_halls} desired, {} back-to-back issue(s)",
            option.study_halls_placed, option.back_to_back_issues
        ),
    }
}
