//! Core data model types for examlens.
//!
//! Raw record types mirror the rows delivered by the tabular loader: every
//! field is text, and an absent column is an empty string. Derived types are
//! produced by the query engine and are never stored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One row of a record file: column name → cell text.
pub type FieldMap = BTreeMap<String, String>;

/// Builds a raw record from one row of field mappings.
pub trait FromFields: Sized {
    fn from_fields(fields: &FieldMap) -> Self;
}

fn field(fields: &FieldMap, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

/// Stage-level insight text for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInsightRecord {
    /// Student key (the student's name in current datasets).
    pub student_key: String,
    pub early_stage: String,
    pub mid_course_stage: String,
    pub pre_exam_stage: String,
}

impl FromFields for StudentInsightRecord {
    fn from_fields(fields: &FieldMap) -> Self {
        Self {
            student_key: field(fields, "student_name"),
            early_stage: field(fields, "early_stage"),
            mid_course_stage: field(fields, "midcourse_stage"),
            pre_exam_stage: field(fields, "preexam_stage"),
        }
    }
}

/// Focus/steady zone text for one student on one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInsightRecord {
    pub student_key: String,
    pub exam_key: String,
    /// `-`-bulleted focus zone list.
    pub focus_text: String,
    /// `-`-bulleted steady zone list.
    pub study_text: String,
}

impl FromFields for TestInsightRecord {
    fn from_fields(fields: &FieldMap) -> Self {
        Self {
            student_key: field(fields, "student_name"),
            exam_key: field(fields, "exam_name"),
            focus_text: field(fields, "i_focus"),
            study_text: field(fields, "i_study"),
        }
    }
}

/// Cohort-level focus/steady zone text for one batch on one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestWiseInsightRecord {
    pub batch_key: String,
    pub exam_key: String,
    /// Bare-line focus zone list.
    pub focus_text: String,
    /// Bare-line steady zone list.
    pub steady_text: String,
}

impl FromFields for TestWiseInsightRecord {
    fn from_fields(fields: &FieldMap) -> Self {
        Self {
            batch_key: field(fields, "batch_id"),
            exam_key: field(fields, "exam_name"),
            focus_text: field(fields, "focus"),
            steady_text: field(fields, "steady"),
        }
    }
}

/// Stage-level insight text for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInsightRecord {
    pub batch_key: String,
    pub early_stage: String,
    pub mid_course_stage: String,
    pub pre_exam_stage: String,
}

impl FromFields for BatchInsightRecord {
    fn from_fields(fields: &FieldMap) -> Self {
        Self {
            batch_key: field(fields, "batch_id"),
            early_stage: field(fields, "early_stage"),
            mid_course_stage: field(fields, "midcourse_stage"),
            pre_exam_stage: field(fields, "preexam_stage"),
        }
    }
}

/// The three fixed phases of the exam-preparation timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Early Stage")]
    Early,
    #[serde(rename = "Mid-Course Stage")]
    MidCourse,
    #[serde(rename = "Pre-Exam Stage")]
    PreExam,
}

impl Stage {
    /// All stages in timeline order.
    pub const ALL: [Stage; 3] = [Stage::Early, Stage::MidCourse, Stage::PreExam];

    /// Display name used as the stage key in query results.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Early => "Early Stage",
            Stage::MidCourse => "Mid-Course Stage",
            Stage::PreExam => "Pre-Exam Stage",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| format!("unknown stage: {s}"))
    }
}

/// Parsed insight for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInsight {
    /// SUP score; 0 when the source text carries none.
    pub uplift_potential: u32,
    /// "What will go wrong" items, at most three.
    pub predictive: Vec<String>,
    /// "What exactly to fix" items, at most three.
    pub prescriptive: Vec<String>,
}

/// Stage insights keyed by stage, iterated in timeline order.
pub type StageMap = BTreeMap<Stage, StageInsight>;

/// Focus and steady zone lists, each at most three items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInsight {
    pub focus: Vec<String>,
    pub steady: Vec<String>,
}

/// Roster entry for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub display_name: String,
    pub batch_label: String,
    /// Number of test insight records for this student.
    pub exams_attempted: usize,
    pub total_exams: u32,
}

/// Dataset-wide summary figures shown alongside cohort insights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortStats {
    pub total_students: usize,
    pub exams_analyzed: usize,
}
