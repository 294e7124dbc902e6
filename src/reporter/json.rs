//! JSON rendering of a `GenerationResult` (§6 "Generation output").

use crate::engine::GenerationResult;
use crate::error::Result;

/// Pretty-print the whole result, options and all.
pub fn generate_json_report(result: &GenerationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// A compact summary, one row per surviving option.
#[derive(serde::Serialize)]
pub struct JsonSummary {
    pub status: String,
    pub option_count: usize,
    pub options: Vec<JsonOptionSummary>,
}

#[derive(serde::Serialize)]
pub struct JsonOptionSummary {
    pub option_number: usize,
    pub seed: u32,
    pub study_halls_placed: usize,
    pub back_to_back_issues: u32,
}

pub fn generate_json_summary(result: &GenerationResult) -> Result<String> {
    let summary = JsonSummary {
        status: format!("{:?}", result.status).to_lowercase(),
        option_count: result.options.len(),
        options: result
            .options
            .iter()
            .map(|o| JsonOptionSummary {
                option_number: o.option_number,
                seed: o.seed,
                study_halls_placed: o.study_halls_placed,
                back_to_back_issues: o.back_to_back_issues,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}
