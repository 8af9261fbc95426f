//! Query engine over one insight snapshot.
//!
//! Joins the four record collections and runs the text parsers to answer
//! per-student and per-batch insight queries. Missing records never fail a
//! query; they degrade to empty or zeroed results.

use serde::{Deserialize, Serialize};

use crate::model::{CohortStats, Stage, StageMap, StudentProfile, ZoneInsight};
use crate::parser::{parse_cohort_zone, parse_stage, parse_student_zone};
use crate::repository::{ExamOrder, InsightSnapshot};
use crate::statistics::{compute_cohort_stats, exam_attempts};

/// Deployment-time constants used when building query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Batch label shown on every student profile.
    pub batch_label: String,
    /// Number of exams in the series.
    pub total_exams: u32,
    /// Sort rule for exam listings.
    pub exam_order: ExamOrder,
}

pub const DEFAULT_BATCH_LABEL: &str = "CC Batch 1";
pub const DEFAULT_TOTAL_EXAMS: u32 = 25;

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            batch_label: DEFAULT_BATCH_LABEL.to_string(),
            total_exams: DEFAULT_TOTAL_EXAMS,
            exam_order: ExamOrder::default(),
        }
    }
}

/// Stage and zone insight for one student on one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInsight {
    pub stages: StageMap,
    pub zones: ZoneInsight,
}

/// Cohort stats, stage and zone insight for one batch on one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInsight {
    pub stats: CohortStats,
    pub stages: StageMap,
    pub zones: ZoneInsight,
}

fn parse_stages(early: Option<&str>, mid_course: Option<&str>, pre_exam: Option<&str>) -> StageMap {
    Stage::ALL
        .into_iter()
        .zip([early, mid_course, pre_exam])
        .map(|(stage, text)| (stage, parse_stage(text)))
        .collect()
}

/// Answers insight queries against a borrowed snapshot.
#[derive(Debug, Clone)]
pub struct QueryEngine<'a> {
    snapshot: &'a InsightSnapshot,
    settings: EngineSettings,
}

impl<'a> QueryEngine<'a> {
    pub fn new(snapshot: &'a InsightSnapshot) -> Self {
        Self::with_settings(snapshot, EngineSettings::default())
    }

    pub fn with_settings(snapshot: &'a InsightSnapshot, settings: EngineSettings) -> Self {
        Self { snapshot, settings }
    }

    pub fn snapshot(&self) -> &'a InsightSnapshot {
        self.snapshot
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// One profile per distinct student key, in first-seen order.
    pub fn list_students(&self) -> Vec<StudentProfile> {
        self.snapshot
            .distinct_student_keys()
            .into_iter()
            .map(|key| StudentProfile {
                id: key.to_string(),
                display_name: key.to_string(),
                batch_label: self.settings.batch_label.clone(),
                exams_attempted: exam_attempts(self.snapshot, key),
                total_exams: self.settings.total_exams,
            })
            .collect()
    }

    /// Distinct exam keys from test records, sorted by the configured order.
    pub fn list_exams(&self) -> Vec<String> {
        self.snapshot
            .distinct_exam_keys(self.settings.exam_order)
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Distinct batch keys from batch records.
    pub fn list_batches(&self) -> Vec<String> {
        self.snapshot
            .distinct_batch_keys()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Stage insight from the student record and zone insight from the
    /// student's test record for `exam_key`. The two joins are independent.
    pub fn student_insight(&self, student_key: &str, exam_key: &str) -> StudentInsight {
        let record = self.snapshot.find_student_record(student_key);
        if record.is_none() {
            tracing::debug!(student = student_key, "no student insight record");
        }
        let stages = parse_stages(
            record.map(|r| r.early_stage.as_str()),
            record.map(|r| r.mid_course_stage.as_str()),
            record.map(|r| r.pre_exam_stage.as_str()),
        );

        let test = self.snapshot.find_test_record(student_key, exam_key);
        if test.is_none() {
            tracing::debug!(
                student = student_key,
                exam = exam_key,
                "no test insight record"
            );
        }
        let zones = ZoneInsight {
            focus: parse_student_zone(test.map(|t| t.focus_text.as_str())),
            steady: parse_student_zone(test.map(|t| t.study_text.as_str())),
        };

        StudentInsight { stages, zones }
    }

    /// Dataset-wide stats plus stage and cohort zone insight for one batch.
    pub fn batch_insight(&self, batch_key: &str, exam_key: &str) -> BatchInsight {
        let stats = compute_cohort_stats(self.snapshot);

        let record = self.snapshot.find_batch_record(batch_key);
        if record.is_none() {
            tracing::debug!(batch = batch_key, "no batch insight record");
        }
        let stages = parse_stages(
            record.map(|r| r.early_stage.as_str()),
            record.map(|r| r.mid_course_stage.as_str()),
            record.map(|r| r.pre_exam_stage.as_str()),
        );

        let test_wise = self.snapshot.find_test_wise_record(batch_key, exam_key);
        if test_wise.is_none() {
            tracing::debug!(
                batch = batch_key,
                exam = exam_key,
                "no test-wise insight record"
            );
        }
        let zones = ZoneInsight {
            focus: parse_cohort_zone(test_wise.map(|t| t.focus_text.as_str())),
            steady: parse_cohort_zone(test_wise.map(|t| t.steady_text.as_str())),
        };

        BatchInsight {
            stats,
            stages,
            zones,
        }
    }
}
