//! Insight report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{BatchInsight, StudentInsight};
use crate::model::{StageMap, ZoneInsight};

const EMPTY_PLACEHOLDER: &str = "_No insights available._";

/// One query result together with what was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportSubject {
    Student {
        student: String,
        exam: String,
        insight: StudentInsight,
    },
    Batch {
        batch: String,
        exam: String,
        insight: BatchInsight,
    },
}

/// A saved insight report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    /// When the report was created.
    pub generated_at: DateTime<Utc>,
    pub subject: ReportSubject,
}

impl InsightReport {
    pub fn for_student(student: &str, exam: &str, insight: StudentInsight) -> Self {
        Self {
            generated_at: Utc::now(),
            subject: ReportSubject::Student {
                student: student.to_string(),
                exam: exam.to_string(),
                insight,
            },
        }
    }

    pub fn for_batch(batch: &str, exam: &str, insight: BatchInsight) -> Self {
        Self {
            generated_at: Utc::now(),
            subject: ReportSubject::Batch {
                batch: batch.to_string(),
                exam: exam.to_string(),
                insight,
            },
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: InsightReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        let (stages, zones) = match &self.subject {
            ReportSubject::Student {
                student,
                exam,
                insight,
            } => {
                md.push_str(&format!("# Student insight: {student} ({exam})\n\n"));
                md.push_str(&self.generated_line());
                (&insight.stages, &insight.zones)
            }
            ReportSubject::Batch {
                batch,
                exam,
                insight,
            } => {
                md.push_str(&format!("# Batch insight: {batch} ({exam})\n\n"));
                md.push_str(&self.generated_line());
                md.push_str("## Cohort\n\n");
                md.push_str("| Total students | Exams analyzed |\n");
                md.push_str("|----------------|----------------|\n");
                md.push_str(&format!(
                    "| {} | {} |\n\n",
                    insight.stats.total_students, insight.stats.exams_analyzed
                ));
                (&insight.stages, &insight.zones)
            }
        };

        push_stages(&mut md, stages);
        push_zones(&mut md, zones);
        md
    }

    fn generated_line(&self) -> String {
        format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

fn push_list(md: &mut String, items: &[String]) {
    if items.is_empty() {
        md.push_str(EMPTY_PLACEHOLDER);
        md.push('\n');
    } else {
        for item in items {
            md.push_str(&format!("- {item}\n"));
        }
    }
    md.push('\n');
}

fn push_stages(md: &mut String, stages: &StageMap) {
    for (stage, insight) in stages {
        md.push_str(&format!("## {stage}\n\n"));
        md.push_str(&format!(
            "**Uplift potential:** {}\n\n",
            insight.uplift_potential
        ));
        md.push_str("### What will go wrong\n\n");
        push_list(md, &insight.predictive);
        md.push_str("### What exactly to fix\n\n");
        push_list(md, &insight.prescriptive);
    }
}

fn push_zones(md: &mut String, zones: &ZoneInsight) {
    md.push_str("## Focus zone\n\n");
    push_list(md, &zones.focus);
    md.push_str("## Steady zone\n\n");
    push_list(md, &zones.steady);
}
