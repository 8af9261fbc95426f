//! Cohort summary statistics.
//!
//! These figures describe the whole snapshot. They do not depend on which
//! batch or exam a caller is looking at.

use crate::model::CohortStats;
use crate::repository::{ExamOrder, InsightSnapshot};

/// Compute dataset-wide cohort statistics.
///
/// `total_students` counts distinct non-empty student keys across student
/// records; `exams_analyzed` counts distinct non-empty exam keys across test
/// records.
pub fn compute_cohort_stats(snapshot: &InsightSnapshot) -> CohortStats {
    CohortStats {
        total_students: snapshot.distinct_student_keys().len(),
        exams_analyzed: snapshot
            .distinct_exam_keys(ExamOrder::Lexicographic)
            .len(),
    }
}

/// Number of test insight records for `student_key`.
pub fn exam_attempts(snapshot: &InsightSnapshot, student_key: &str) -> usize {
    snapshot
        .tests
        .iter()
        .filter(|t| t.student_key == student_key)
        .count()
}
