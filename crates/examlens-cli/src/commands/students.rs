//! The `examlens students` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use examlens_core::engine::QueryEngine;

use super::{check_format, DataSource};

pub fn execute(source: &DataSource, format: &str) -> Result<()> {
    check_format(format, &["text", "json"])?;
    let (config, snapshot) = source.load()?;
    let engine = QueryEngine::with_settings(&snapshot, config.engine_settings());
    let students = engine.list_students();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&students)?);
        return Ok(());
    }

    if students.is_empty() {
        println!("No students found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Student", "Batch", "Exams attempted"]);
    for s in &students {
        table.add_row(vec![
            Cell::new(&s.display_name),
            Cell::new(&s.batch_label),
            Cell::new(format!("{}/{}", s.exams_attempted, s.total_exams)),
        ]);
    }
    println!("{table}");
    println!("{} student(s)", students.len());

    Ok(())
}
