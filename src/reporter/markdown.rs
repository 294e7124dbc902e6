//! Markdown rendering of a `GenerationResult` (§6): one section per surviving
//! option, with a per-teacher grid table, study-hall placements, and stats.

use crate::engine::output::ScheduleOption;
use crate::engine::GenerationResult;
use crate::types::{Block, Day};
use std::fmt::Write as _;

fn grid_table(header: &str, cell_text: impl Fn(Day, Block) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#### {header}\n");
    let _ = writeln!(out, "| | {} |", Day::NAMES.join(" | "));
    let mut sep = String::from("|---");
    for _ in Day::NAMES {
        sep.push_str("|---");
    }
    sep.push('|');
    let _ = writeln!(out, "{sep}");
    for block_num in 1..=5u8 {
        let block = Block(block_num);
        let mut row = format!("| P{block_num}");
        for day in Day::all() {
            let _ = write!(row, " | {}", cell_text(day, block));
        }
        row.push('|');
        let _ = writeln!(out, "{row}");
    }
    out
}

fn teacher_grid_section(option: &ScheduleOption) -> String {
    let mut names: Vec<String> = option.teacher_grids.keys().cloned().collect();
    names.sort();
    let mut out = String::from("### Teacher grids\n\n");
    for name in &names {
        let grid = &option.teacher_grids[name];
        out.push_str(&grid_table(name, |day, block| {
            match grid.get(crate::types::Slot::new(day, block)) {
                None => "-".to_string(),
                Some(cell) if cell.is_open() => "OPEN".to_string(),
                Some(cell) if cell.is_study_hall() => format!("Study Hall ({})", cell.grade_display),
                Some(cell) => format!("{} ({})", cell.subject, cell.grade_display),
            }
        }));
        out.push('\n');
    }
    out
}

fn grade_grid_section(option: &ScheduleOption) -> String {
    let mut names: Vec<String> = option.grade_grids.keys().cloned().collect();
    names.sort();
    let mut out = String::from("### Grade grids\n\n");
    for name in &names {
        let grid = &option.grade_grids[name];
        out.push_str(&grid_table(name, |day, block| {
            match grid.get(crate::types::Slot::new(day, block)) {
                None => "-".to_string(),
                Some(cell) => format!("{} w/ {}", cell.subject, cell.teacher),
            }
        }));
        out.push('\n');
    }
    out
}

fn stats_section(option: &ScheduleOption) -> String {
    let mut names: Vec<&String> = option.teacher_stats.keys().collect();
    names.sort();
    let mut out = String::from("### Teacher stats\n\n");
    out.push_str("| Teacher | Teaching | Study Hall | Open | Back-to-back |\n");
    out.push_str("|---------|----------|------------|------|---------------|\n");
    for name in names {
        let s = &option.teacher_stats[name];
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            name, s.teaching, s.study_hall, s.open, s.back_to_back
        );
    }
    out
}

fn study_hall_section(option: &ScheduleOption) -> String {
    let mut out = String::from("\n### Study hall assignments\n\n");
    if option.study_hall_assignments.is_empty() {
        out.push_str("_none configured_\n");
        return out;
    }
    out.push_str("| Group | Teacher | Day | Block |\n");
    out.push_str("|-------|---------|-----|-------|\n");
    for a in &option.study_hall_assignments {
        let teacher = a.teacher.as_deref().unwrap_or("**UNPLACED**");
        let day = a.day.map(|d| d.name().to_string()).unwrap_or_else(|| "-".to_string());
        let block = a.block.map(|b| b.0.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "| {} | {} | {} | {} |", a.group, teacher, day, block);
    }
    out
}

fn option_section(option: &ScheduleOption) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Option {} (seed {})\n", option.option_number, option.seed);
    let _ = writeln!(
        out,
        "Study halls placed: {} | Back-to-back issues: {}\n",
        option.study_halls_placed, option.back_to_back_issues
    );
    out.push_str(&stats_section(option));
    out.push_str(&study_hall_section(option));
    out.push('\n');
    out.push_str(&teacher_grid_section(option));
    out.push_str(&grade_grid_section(option));
    out
}

/// Render a whole `GenerationResult` as a Markdown document.
pub fn generate_markdown_report(result: &GenerationResult) -> String {
    let mut lines = vec!["# Schedule Generation Report".to_string(), String::new()];

    lines.push(format!("Status: **{:?}**\n", result.status));
    if let Some(message) = &result.message {
        lines.push(format!("> {message}\n"));
    }

    if result.options.is_empty() {
        lines.push("No surviving schedule options.".to_string());
    } else {
        lines.push(format!("{} option(s) generated.\n", result.options.len()));
        for option in &result.options {
            lines.push(option_section(option));
        }
    }

    lines.join("\n")
}
