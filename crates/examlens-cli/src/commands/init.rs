//! The `examlens init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("examlens.toml").exists() {
        println!("examlens.toml already exists, skipping.");
    } else {
        std::fs::write("examlens.toml", SAMPLE_CONFIG)?;
        println!("Created examlens.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point data_dir in examlens.toml at your insight record files");
    println!("  2. Run: examlens students");
    println!("  3. Run: examlens student --name <student> --exam <exam>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examlens configuration

# Directory holding the insight record files.
data_dir = "./data"

# Shown on every student profile.
batch_label = "CC Batch 1"
total_exams = 25

# "lexicographic" for named exams ("Mock 1"), "numeric" for bare exam IDs.
exam_order = "lexicographic"

[files]
students = "student_specific_insights.csv"
tests = "test_insights.csv"
test_wise = "test_wise_insights.csv"
batches = "batch_insights.csv"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config: examlens_core::config::ExamlensConfig =
            toml_from_sample().expect("sample config should parse");
        assert_eq!(config.total_exams, 25);
        assert_eq!(config.files.tests, "test_insights.csv");
    }

    fn toml_from_sample() -> Result<examlens_core::config::ExamlensConfig> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("examlens.toml");
        std::fs::write(&path, SAMPLE_CONFIG)?;
        examlens_core::config::parse_config_file(&path)
    }
}
