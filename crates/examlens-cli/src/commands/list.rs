//! The `examlens exams` and `examlens batches` commands.

use anyhow::Result;

use examlens_core::engine::QueryEngine;

use super::{check_format, DataSource};

pub fn exams(source: &DataSource, format: &str) -> Result<()> {
    check_format(format, &["text", "json"])?;
    let (config, snapshot) = source.load()?;
    let engine = QueryEngine::with_settings(&snapshot, config.engine_settings());
    print_keys(&engine.list_exams(), format, "No exams found.")
}

pub fn batches(source: &DataSource, format: &str) -> Result<()> {
    check_format(format, &["text", "json"])?;
    let (config, snapshot) = source.load()?;
    let engine = QueryEngine::with_settings(&snapshot, config.engine_settings());
    print_keys(&engine.list_batches(), format, "No batches found.")
}

fn print_keys(keys: &[String], format: &str, empty_message: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(keys)?);
    } else if keys.is_empty() {
        println!("{empty_message}");
    } else {
        for key in keys {
            println!("{key}");
        }
    }
    Ok(())
}
