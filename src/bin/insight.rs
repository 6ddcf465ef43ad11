//! Insight CLI - command-line interface for FRSP Insight
//!
//! Commands:
//! - report: derive the full analytics report for a selection
//! - validate: check datasets against the closed mapping tables
//! - sections: print the batch/section/roll-base tables

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use frsp_insight::sections::{roll_base, BATCH_SECTIONS};
use frsp_insight::types::AttendanceTable;
use frsp_insight::{Dataset, ReportEncoder, Selection, INSIGHT_VERSION, PRODUCER_NAME};

/// Insight - derivation engine for FRSP session analytics
#[derive(Parser)]
#[command(name = "insight")]
#[command(version = INSIGHT_VERSION)]
#[command(about = "Derive attendance and assessment analytics from dashboard datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the full analytics report for a selection
    Report {
        /// Student roster JSON path (use - for stdin)
        #[arg(long)]
        students: PathBuf,

        /// Attendance batches JSON path (use - for stdin)
        #[arg(long)]
        attendance: PathBuf,

        /// Narrow the report to one academic year
        #[arg(long)]
        year: Option<String>,

        /// Narrow the report to one section (requires --year)
        #[arg(long)]
        section: Option<String>,

        /// Output format; defaults to json-pretty on a terminal, json otherwise
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Check datasets against the closed mapping tables
    Validate {
        /// Student roster JSON path (use - for stdin)
        #[arg(long)]
        students: PathBuf,

        /// Attendance batches JSON path (use - for stdin)
        #[arg(long)]
        attendance: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the batch/section/roll-base tables
    Sections {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable summary
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), InsightCliError> {
    match cli.command {
        Commands::Report {
            students,
            attendance,
            year,
            section,
            format,
        } => cmd_report(
            &students,
            &attendance,
            year.as_deref(),
            section.as_deref(),
            format,
        ),

        Commands::Validate {
            students,
            attendance,
            json,
        } => cmd_validate(&students, &attendance, json),

        Commands::Sections { json } => cmd_sections(json),
    }
}

fn cmd_report(
    students: &Path,
    attendance: &Path,
    year: Option<&str>,
    section: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<(), InsightCliError> {
    let dataset = load_dataset(students, attendance)?;

    let mut selection = Selection::default();
    if let Some(year) = year {
        selection.select_year(year);
    }
    if let Some(section) = section {
        if selection.year().is_none() {
            return Err(InsightCliError::SectionWithoutYear);
        }
        selection.select_section(section);
    }

    let format = format.unwrap_or(if atty::is(atty::Stream::Stdout) {
        OutputFormat::JsonPretty
    } else {
        OutputFormat::Json
    });

    let encoder = ReportEncoder::new();
    let payload = encoder.encode(&dataset, &selection);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&payload)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&payload)?),
        OutputFormat::Text => print_text_report(&payload),
    }

    Ok(())
}

fn print_text_report(payload: &frsp_insight::ReportPayload) {
    println!("Insight Report ({} {})", PRODUCER_NAME, INSIGHT_VERSION);
    println!("=================");
    match (payload.selection.year(), payload.selection.section()) {
        (Some(year), Some(section)) => println!("Selection: {} / {}", year, section),
        (Some(year), None) => println!("Selection: {}", year),
        _ => println!("Selection: all years"),
    }
    println!();
    println!("Students:       {}", payload.attendance.total_students);
    if payload.attendance.has_attendance_data {
        println!(
            "Avg attendance: {:.1}% ({} days tracked)",
            payload.attendance.avg_attendance, payload.attendance.days_tracked
        );
    } else {
        println!("Avg attendance: no session data for this selection");
    }

    let stats = &payload.assessment.stats;
    println!("Assessed:       {}", stats.assessed_count);
    println!("Avg score:      {:.1} / 50", stats.avg_total);
    println!("Pass rate:      {:.1}%", stats.pass_rate);
    println!("Highest:        {:.0}", stats.highest);
    println!();
    println!("Score distribution:");
    for bucket in &stats.histogram {
        println!("  {:>6}: {}", bucket.range, bucket.count);
    }
    println!();
    println!(
        "Attendance/score correlation: r = {:.3} over {} students",
        payload.correlation.correlation,
        payload.correlation.pairs.len()
    );
}

fn cmd_validate(students: &Path, attendance: &Path, json: bool) -> Result<(), InsightCliError> {
    let students_json = read_input(students)?;
    let attendance_json = read_input(attendance)?;

    let roster: Vec<frsp_insight::types::StudentRecord> = serde_json::from_str(&students_json)?;
    let table: AttendanceTable = serde_json::from_str(&attendance_json)?;

    let unknown_batches: Vec<String> = table
        .keys()
        .filter(|label| BATCH_SECTIONS.iter().all(|m| m.batch != label.as_str()))
        .cloned()
        .collect();

    let mut sections_without_attendance: Vec<String> = roster
        .iter()
        .filter(|s| BATCH_SECTIONS.iter().all(|m| m.section != s.section))
        .map(|s| s.section.clone())
        .collect();
    sections_without_attendance.sort();
    sections_without_attendance.dedup();

    let mut unresolvable_rolls = 0usize;
    for student in &roster {
        if BATCH_SECTIONS.iter().any(|m| m.section == student.section)
            && frsp_insight::resolve_roll(&student.reg_no, &student.section) <= 0
        {
            unresolvable_rolls += 1;
        }
    }

    let report = ValidationReport {
        total_students: roster.len(),
        total_batches: table.len(),
        unknown_batches,
        sections_without_attendance,
        unresolvable_rolls,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Students:           {}", report.total_students);
        println!("Attendance batches: {}", report.total_batches);
        println!("Unresolvable rolls: {}", report.unresolvable_rolls);

        if report.unknown_batches.is_empty() {
            println!("Batch labels:       all mapped");
        } else {
            println!("Unknown batch labels:");
            for label in &report.unknown_batches {
                println!("  - {}", label);
            }
        }

        if !report.sections_without_attendance.is_empty() {
            println!("Sections without attendance data:");
            for section in &report.sections_without_attendance {
                println!("  - {}", section);
            }
        }
    }

    if report.unknown_batches.is_empty() {
        Ok(())
    } else {
        Err(InsightCliError::ValidationFailed(
            report.unknown_batches.len(),
        ))
    }
}

fn cmd_sections(json: bool) -> Result<(), InsightCliError> {
    if json {
        let rows: Vec<SectionRow> = BATCH_SECTIONS
            .iter()
            .map(|m| SectionRow {
                batch: m.batch,
                year: m.year,
                section: m.section,
                roll_base: roll_base(m.section),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Batch         Year      Section       Roll base");
        println!("-----------------------------------------------");
        for m in &BATCH_SECTIONS {
            let base = roll_base(m.section)
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{:<13} {:<9} {:<13} {}", m.batch, m.year, m.section, base);
        }
    }

    Ok(())
}

// Helper functions

fn load_dataset(students: &Path, attendance: &Path) -> Result<Dataset, InsightCliError> {
    let students_json = read_input(students)?;
    let attendance_json = read_input(attendance)?;
    Ok(Dataset::from_json(&students_json, &attendance_json)?)
}

fn read_input(path: &Path) -> Result<String, InsightCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

// Error types

#[derive(Debug)]
enum InsightCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Insight(frsp_insight::InsightError),
    SectionWithoutYear,
    ValidationFailed(usize),
}

impl From<io::Error> for InsightCliError {
    fn from(e: io::Error) -> Self {
        InsightCliError::Io(e)
    }
}

impl From<serde_json::Error> for InsightCliError {
    fn from(e: serde_json::Error) -> Self {
        InsightCliError::Json(e)
    }
}

impl From<frsp_insight::InsightError> for InsightCliError {
    fn from(e: frsp_insight::InsightError) -> Self {
        InsightCliError::Insight(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<InsightCliError> for CliError {
    fn from(e: InsightCliError) -> Self {
        match e {
            InsightCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            InsightCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            InsightCliError::Insight(e) => CliError {
                code: "DATASET_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'insight validate' for details".to_string()),
            },
            InsightCliError::SectionWithoutYear => CliError {
                code: "SECTION_WITHOUT_YEAR".to_string(),
                message: "--section requires --year".to_string(),
                hint: Some("Pass --year along with --section".to_string()),
            },
            InsightCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} unknown batch labels", count),
                hint: Some("Fix the attendance dataset labels and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_students: usize,
    total_batches: usize,
    unknown_batches: Vec<String>,
    sections_without_attendance: Vec<String>,
    unresolvable_rolls: usize,
}

#[derive(serde::Serialize)]
struct SectionRow {
    batch: &'static str,
    year: &'static str,
    section: &'static str,
    roll_base: Option<i64>,
}
