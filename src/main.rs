use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use timetable_engine::engine::{generate, GenerationResult, GenerationStatus, ProgressReporter};
use timetable_engine::parser::{load_input_from_dir, save_result_json, validate_input};
use timetable_engine::reporter::{generate_reports, print_summary, OutputFormat};
use timetable_engine::validator::validate_option;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "timetable-engine")]
#[command(about = "Weekly K-11 class timetable generation engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate weekly timetables from a data directory
    Generate {
        /// Directory containing teachers.json, classes.json, grades.json, rules.json
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for generated reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Output format(s): json, markdown, text, or all
        #[arg(short, long, default_value = "all")]
        format: String,

        /// Suppress progress output, print a JSON summary only
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run generation against the bundled sample data, creating it first if absent
    Demo,

    /// Check every option in a previously-generated schedule.json against the
    /// hard invariants and print its soft score
    Verify {
        /// Directory containing the original input data
        #[arg(short, long)]
        data: PathBuf,

        /// Path to a schedule.json produced by `generate`
        #[arg(short, long, default_value = "./output/schedule.json")]
        result: PathBuf,
    },

    /// Reconcile one option's study-hall assignment list against its teacher
    /// grids after a manual edit, and print the reconciled list
    Reconcile {
        /// Path to a schedule.json produced by `generate`
        #[arg(short, long, default_value = "./output/schedule.json")]
        result: PathBuf,

        /// Which option_number to reconcile
        #[arg(long, default_value_t = 1)]
        option: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { data, output, format, quiet } => run_generate(&data, &output, &format, quiet),
        Commands::Demo => run_demo(),
        Commands::Verify { data, result } => run_verify(&data, &result),
        Commands::Reconcile { result, option } => run_reconcile(&result, option),
    }
}

struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn on_init(&mut self, total_attempts: usize) {
        self.bar.set_length(total_attempts as u64);
    }

    fn on_attempt(&mut self, attempt: usize, _total_attempts: usize, message: &str) {
        self.bar.set_position(attempt as u64);
        self.bar.set_message(message.to_string());
    }
}

fn run_generate(data: &PathBuf, output: &PathBuf, format: &str, quiet: bool) -> Result<()> {
    let input = load_input_from_dir(data).context("failed to load input data")?;

    let validation = validate_input(&input);
    if !quiet {
        for warning in &validation.warnings {
            println!("{} {}", "warning:".yellow(), warning);
        }
    }
    if !validation.is_valid() {
        for error in &validation.errors {
            eprintln!("{} {}", "error:".red().bold(), error);
        }
        anyhow::bail!("input failed validation");
    }

    if !quiet {
        println!(
            "Loaded {} teachers, {} classes, {} grades",
            input.teachers.len(),
            input.classes.len(),
            input.grades.len()
        );
        println!("\nGenerating schedules...\n");
    }

    let result = if quiet {
        let mut progress = timetable_engine::engine::NoOpProgress;
        generate(&input, &mut progress)
    } else {
        let mut progress = CliProgress::new(input.config.num_attempts.max(1));
        let result = generate(&input, &mut progress);
        progress.bar.finish_and_clear();
        result
    };

    save_result_json(&result, output)?;
    let formats = parse_formats(format);
    generate_reports(&result, output, &formats)?;

    if quiet {
        let summary = timetable_engine::reporter::generate_json_summary(&result)?;
        println!("{}", summary);
    } else {
        print_summary(&result);
        println!("Reports written to: {}", output.display().to_string().green());
    }

    if result.status != GenerationStatus::Success {
        anyhow::bail!(result.message.unwrap_or_else(|| "generation did not succeed".to_string()));
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("{}", "Timetable Engine Demo".bold().cyan());
    println!("{}", "-".repeat(40));

    let demo_path = PathBuf::from("data/demo");
    let output_path = PathBuf::from("output");

    if !demo_path.join("teachers.json").exists() {
        println!("{}", "Demo data not found. Creating sample data...".yellow());
        create_demo_data(&demo_path)?;
    }

    run_generate(&demo_path, &output_path, "all", false)
}

fn run_verify(data: &PathBuf, result_path: &PathBuf) -> Result<()> {
    let input = load_input_from_dir(data).context("failed to load input data")?;
    let result: GenerationResult = load_result(result_path)?;

    let rule_set = timetable_engine::engine::rules::RuleSet::new(&input.rules);
    let desired = rule_set.study_hall_grades().grades.len();

    let mut any_invalid = false;
    for option in &result.options {
        let report = validate_option(option, &input.grades, &rule_set, desired);
        if report.is_valid {
            println!(
                "{} option {}: score {:.1}/100",
                "✓".green(),
                option.option_number,
                report.score.score
            );
        } else {
            any_invalid = true;
            println!("{} option {}:", "✗".red().bold(), option.option_number);
            for violation in &report.violations {
                println!("    - {}: {}", violation.constraint.red(), violation.message);
            }
        }
    }

    if any_invalid {
        anyhow::bail!("one or more options failed invariant checks");
    }

    Ok(())
}

fn run_reconcile(result_path: &PathBuf, option_number: usize) -> Result<()> {
    let mut result: GenerationResult = load_result(result_path)?;
    let option = result
        .options
        .iter_mut()
        .find(|o| o.option_number == option_number)
        .with_context(|| format!("no option numbered {option_number} in {}", result_path.display()))?;

    let reconciled = timetable_engine::engine::stats::reconcile_study_hall_assignments(
        &option.study_hall_assignments,
        &option.teacher_grids,
    );
    option.study_hall_assignments = reconciled;

    println!("{}", serde_json::to_string_pretty(&option.study_hall_assignments)?);
    Ok(())
}

fn load_result(path: &PathBuf) -> Result<GenerationResult> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn parse_formats(format: &str) -> Vec<OutputFormat> {
    if format == "all" {
        return vec![OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Text];
    }

    format
        .split(',')
        .filter_map(|f| match f.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "text" | "txt" => Some(OutputFormat::Text),
            _ => None,
        })
        .collect()
}

fn create_demo_data(path: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(path)?;

    let teachers = serde_json::json!([
        {"name": "Ms. Anderson", "status": "full-time", "can_supervise_study_hall": "eligible"},
        {"name": "Mr. Baker", "status": "full-time", "can_supervise_study_hall": "eligible"},
        {"name": "Dr. Clark", "status": "full-time", "can_supervise_study_hall": "eligible"},
        {"name": "Ms. Davis", "status": "part-time", "can_supervise_study_hall": "excluded"},
        {"name": "Mr. Evans", "status": "full-time", "can_supervise_study_hall": "eligible"},
        {"name": "Coach Fisher", "status": "part-time", "can_supervise_study_hall": "excluded"}
    ]);
    std::fs::write(path.join("teachers.json"), serde_json::to_string_pretty(&teachers)?)?;

    let grades = serde_json::json!([
        {"name": "Kindergarten", "sort_order": 0},
        {"name": "1st Grade", "sort_order": 1},
        {"name": "2nd Grade", "sort_order": 2},
        {"name": "3rd Grade", "sort_order": 3},
        {"name": "4th Grade", "sort_order": 4},
        {"name": "5th Grade", "sort_order": 5}
    ]);
    std::fs::write(path.join("grades.json"), serde_json::to_string_pretty(&grades)?)?;

    let classes = serde_json::json!([
        {"teacher": "Ms. Anderson", "grade_display": "1st Grade", "subject": "Math", "days_per_week": 5},
        {"teacher": "Ms. Anderson", "grade_display": "2nd Grade", "subject": "Math", "days_per_week": 5},
        {"teacher": "Mr. Baker", "grade_display": "1st Grade", "subject": "Reading", "days_per_week": 5},
        {"teacher": "Mr. Baker", "grade_display": "2nd Grade", "subject": "Reading", "days_per_week": 5},
        {"teacher": "Dr. Clark", "grade_display": "3rd Grade", "subject": "Science", "days_per_week": 4},
        {"teacher": "Dr. Clark", "grade_display": "4th-5th Grade", "subject": "Science", "days_per_week": 4},
        {"teacher": "Mr. Evans", "grade_display": "K-5th Grade Electives", "subject": "Art", "days_per_week": 2, "is_elective": true},
        {"teacher": "Ms. Davis", "grade_display": "Kindergarten", "subject": "Reading", "days_per_week": 3},
        {"teacher": "Coach Fisher", "grade_display": "K-5th Grade Electives", "subject": "PE", "days_per_week": 3, "is_elective": true}
    ]);
    std::fs::write(path.join("classes.json"), serde_json::to_string_pretty(&classes)?)?;

    let rules = serde_json::json!([
        {"rule_key": "no_duplicate_subjects", "enabled": true},
        {"rule_key": "no_btb_open", "enabled": true},
        {"rule_key": "spread_open", "enabled": true},
        {
            "rule_key": "study_hall_grades",
            "enabled": true,
            "config": {"grades": ["3rd Grade", "4th Grade", "5th Grade"]}
        },
        {
            "rule_key": "study_hall_teacher_eligibility",
            "enabled": true,
            "config": {"allow_full_time": true, "allow_part_time": false}
        }
    ]);
    std::fs::write(path.join("rules.json"), serde_json::to_string_pretty(&rules)?)?;

    let generation_toml = r#"num_options = 3
num_attempts = 50
timeout_per_attempt_ms = 5000
"#;
    std::fs::write(path.join("generation.toml"), generation_toml)?;

    println!("{}", "Demo data created successfully!".green());
    Ok(())
}
