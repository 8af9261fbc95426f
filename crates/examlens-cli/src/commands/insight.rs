//! The `examlens student` and `examlens batch` commands.

use std::path::PathBuf;

use anyhow::Result;

use examlens_core::engine::QueryEngine;
use examlens_core::model::{StageMap, ZoneInsight};
use examlens_core::report::{InsightReport, ReportSubject};

use super::{check_format, DataSource};

const FORMATS: &[&str] = &["text", "json", "markdown", "md"];

pub fn student(
    source: &DataSource,
    student: &str,
    exam: &str,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    check_format(format, FORMATS)?;
    let (config, snapshot) = source.load()?;
    let engine = QueryEngine::with_settings(&snapshot, config.engine_settings());

    if snapshot.find_student_record(student).is_none() {
        eprintln!("No stage insights recorded for student '{student}'.");
    }
    let insight = engine.student_insight(student, exam);
    emit(InsightReport::for_student(student, exam, insight), format, output)
}

pub fn batch(
    source: &DataSource,
    batch: &str,
    exam: &str,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    check_format(format, FORMATS)?;
    let (config, snapshot) = source.load()?;
    let engine = QueryEngine::with_settings(&snapshot, config.engine_settings());

    if snapshot.find_batch_record(batch).is_none() {
        eprintln!("No stage insights recorded for batch '{batch}'.");
    }
    let insight = engine.batch_insight(batch, exam);
    emit(InsightReport::for_batch(batch, exam, insight), format, output)
}

fn emit(report: InsightReport, format: &str, output: Option<PathBuf>) -> Result<()> {
    match format {
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_text(report: &InsightReport) {
    match &report.subject {
        ReportSubject::Student {
            student,
            exam,
            insight,
        } => {
            println!("Student: {student}  Exam: {exam}\n");
            print_stages(&insight.stages);
            print_zones(&insight.zones);
        }
        ReportSubject::Batch {
            batch,
            exam,
            insight,
        } => {
            println!("Batch: {batch}  Exam: {exam}");
            println!(
                "Students: {}  Exams analyzed: {}\n",
                insight.stats.total_students, insight.stats.exams_analyzed
            );
            print_stages(&insight.stages);
            print_zones(&insight.zones);
        }
    }
}

fn print_list(title: &str, items: &[String], indent: &str) {
    println!("{indent}{title}:");
    if items.is_empty() {
        println!("{indent}  (none)");
    }
    for item in items {
        println!("{indent}  - {item}");
    }
}

fn print_stages(stages: &StageMap) {
    for (stage, insight) in stages {
        println!("{stage} (uplift potential: {})", insight.uplift_potential);
        print_list("What will go wrong", &insight.predictive, "  ");
        print_list("What exactly to fix", &insight.prescriptive, "  ");
        println!();
    }
}

fn print_zones(zones: &ZoneInsight) {
    print_list("Focus zone", &zones.focus, "");
    print_list("Steady zone", &zones.steady, "");
}
