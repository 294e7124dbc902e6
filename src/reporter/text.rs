//! Plain-text / colored-terminal rendering of a `GenerationResult` (§6).

use crate::engine::output::ScheduleOption;
use crate::engine::GenerationResult;
use colored::Colorize;

fn option_block(option: &ScheduleOption) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Option {} (seed {})",
        option.option_number, option.seed
    ));
    lines.push("-".repeat(40));
    lines.push(format!("  Study halls placed:   {}", option.study_halls_placed));
    lines.push(format!("  Back-to-back issues:  {}", option.back_to_back_issues));

    let mut names: Vec<&String> = option.teacher_stats.keys().collect();
    names.sort();
    for name in names {
        let s = &option.teacher_stats[name];
        lines.push(format!(
            "  {:<20} teaching {:>2}  study-hall {:>2}  open {:>2}  b2b {:>2}",
            name, s.teaching, s.study_hall, s.open, s.back_to_back
        ));
    }

    let unplaced = option
        .study_hall_assignments
        .iter()
        .filter(|a| a.teacher.is_none())
        .count();
    if unplaced > 0 {
        lines.push(format!("  {}", format!("{unplaced} study hall group(s) unplaced").yellow()));
    }

    lines.join("\n")
}

/// Generate a plain text report (with colors for terminal)
pub fn generate_text_report(result: &GenerationResult) -> String {
    let mut lines = Vec::new();

    lines.push("=".repeat(60));
    lines.push("               SCHEDULE GENERATION REPORT".to_string());
    lines.push("=".repeat(60));
    lines.push(String::new());

    lines.push(format!("Status: {:?}", result.status));
    if let Some(message) = &result.message {
        lines.push(format!("Message: {message}"));
    }
    lines.push(String::new());

    for option in &result.options {
        lines.push(option_block(option));
        lines.push(String::new());
    }

    lines.push("=".repeat(60));
    lines.join("\n")
}

/// Print a quick summary to stdout, mirroring `print_summary`.
pub fn print_summary(result: &GenerationResult) {
    println!();
    match result.status {
        crate::engine::GenerationStatus::Success => {
            println!(
                "{}",
                format!("✓ Generated {} schedule option(s)", result.options.len())
                    .green()
                    .bold()
            );
        }
        crate::engine::GenerationStatus::Infeasible => {
            println!("{}", "✗ No feasible schedule found".red().bold());
        }
        crate::engine::GenerationStatus::Error => {
            println!("{}", "✗ Generation failed".red().bold());
        }
    }
    if let Some(message) = &result.message {
        println!("  {message}");
    }
    println!();
    for option in &result.options {
        println!(
            "  Option {}: seed {}, {} study hall(s) placed, {} back-to-back issue(s)",
            option.option_number, option.seed, option.study_halls_placed, option.back_to_back_issues
        );
    }
    println!();
}
