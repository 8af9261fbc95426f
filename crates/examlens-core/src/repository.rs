//! Immutable record snapshot and key lookups.
//!
//! A snapshot is built once per data refresh and shared by reference. All
//! lookups are linear scans with exact, case-sensitive key comparison.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::model::{
    BatchInsightRecord, FieldMap, FromFields, StudentInsightRecord, TestInsightRecord,
    TestWiseInsightRecord,
};

/// The four record collections for one query cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightSnapshot {
    pub students: Vec<StudentInsightRecord>,
    pub tests: Vec<TestInsightRecord>,
    pub test_wise: Vec<TestWiseInsightRecord>,
    pub batches: Vec<BatchInsightRecord>,
}

impl InsightSnapshot {
    pub fn new(
        students: Vec<StudentInsightRecord>,
        tests: Vec<TestInsightRecord>,
        test_wise: Vec<TestWiseInsightRecord>,
        batches: Vec<BatchInsightRecord>,
    ) -> Self {
        Self {
            students,
            tests,
            test_wise,
            batches,
        }
    }

    /// Build a snapshot from raw field mappings, one slice per record file.
    pub fn from_rows(
        students: &[FieldMap],
        tests: &[FieldMap],
        test_wise: &[FieldMap],
        batches: &[FieldMap],
    ) -> Self {
        fn build<T: FromFields>(rows: &[FieldMap]) -> Vec<T> {
            rows.iter().map(T::from_fields).collect()
        }

        Self::new(
            build(students),
            build(tests),
            build(test_wise),
            build(batches),
        )
    }

    /// True when none of the four collections holds a record.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.tests.is_empty()
            && self.test_wise.is_empty()
            && self.batches.is_empty()
    }

    pub fn find_student_record(&self, student_key: &str) -> Option<&StudentInsightRecord> {
        self.students.iter().find(|r| r.student_key == student_key)
    }

    pub fn find_test_record(&self, student_key: &str, exam_key: &str) -> Option<&TestInsightRecord> {
        self.tests
            .iter()
            .find(|r| r.student_key == student_key && r.exam_key == exam_key)
    }

    pub fn find_batch_record(&self, batch_key: &str) -> Option<&BatchInsightRecord> {
        self.batches.iter().find(|r| r.batch_key == batch_key)
    }

    pub fn find_test_wise_record(
        &self,
        batch_key: &str,
        exam_key: &str,
    ) -> Option<&TestWiseInsightRecord> {
        self.test_wise
            .iter()
            .find(|r| r.batch_key == batch_key && r.exam_key == exam_key)
    }

    /// Distinct non-empty student keys from student records, in first-seen order.
    pub fn distinct_student_keys(&self) -> Vec<&str> {
        distinct(self.students.iter().map(|r| r.student_key.as_str()))
    }

    /// Distinct non-empty exam keys from test records, sorted by `order`.
    pub fn distinct_exam_keys(&self, order: ExamOrder) -> Vec<&str> {
        let mut keys = distinct(self.tests.iter().map(|r| r.exam_key.as_str()));
        keys.sort_by(|a, b| order.compare(a, b));
        keys
    }

    /// Distinct non-empty batch keys from batch records, sorted lexicographically.
    pub fn distinct_batch_keys(&self) -> Vec<&str> {
        let mut keys = distinct(self.batches.iter().map(|r| r.batch_key.as_str()));
        keys.sort_unstable();
        keys
    }
}

fn distinct<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    keys.filter(|k| !k.is_empty() && seen.insert(*k)).collect()
}

/// Sort rule for exam keys.
///
/// Datasets name exams either with readable labels ("Mock 10") or with bare
/// numeric IDs ("10"), which sort differently. One rule applies to a whole
/// listing; the two are never mixed key by key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamOrder {
    /// Plain byte-wise string order.
    #[default]
    Lexicographic,
    /// Keys compared as unsigned integers. Keys that are not integers sort
    /// after all numeric keys, in string order among themselves.
    Numeric,
}

impl ExamOrder {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            ExamOrder::Lexicographic => a.cmp(b),
            ExamOrder::Numeric => match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            },
        }
    }
}

impl fmt::Display for ExamOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamOrder::Lexicographic => write!(f, "lexicographic"),
            ExamOrder::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for ExamOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicographic" | "lex" | "string" => Ok(ExamOrder::Lexicographic),
            "numeric" | "number" => Ok(ExamOrder::Numeric),
            other => Err(format!("unknown exam order: {other}")),
        }
    }
}

/// Holder for the current snapshot.
///
/// Readers take an `Arc` to the snapshot at the start of a call and keep it
/// for the whole call, so a concurrent [`SnapshotStore::replace`] never
/// yields a mix of old and new collections.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<InsightSnapshot>>,
}

impl SnapshotStore {
    pub fn new(snapshot: InsightSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<InsightSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, snapshot: InsightSnapshot) -> Arc<InsightSnapshot> {
        self.swap(Arc::new(snapshot))
    }

    fn swap(&self, next: Arc<InsightSnapshot>) -> Arc<InsightSnapshot> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }

    /// Load a fresh snapshot with `load` and swap it in.
    ///
    /// On failure the previous snapshot stays in effect and the error is
    /// returned to the caller.
    pub fn reload<E, F>(&self, load: F) -> Result<Arc<InsightSnapshot>, E>
    where
        F: FnOnce() -> Result<InsightSnapshot, E>,
        E: fmt::Display,
    {
        match load() {
            Ok(snapshot) => {
                let loaded = Arc::new(snapshot);
                self.swap(Arc::clone(&loaded));
                Ok(loaded)
            }
            Err(e) => {
                tracing::warn!("snapshot reload failed, keeping previous data: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record(student: &str, exam: &str, focus: &str) -> TestInsightRecord {
        TestInsightRecord {
            student_key: student.into(),
            exam_key: exam.into(),
            focus_text: focus.into(),
            study_text: String::new(),
        }
    }

    fn snapshot() -> InsightSnapshot {
        InsightSnapshot {
            students: vec![
                StudentInsightRecord {
                    student_key: "Asha".into(),
                    ..Default::default()
                },
                StudentInsightRecord {
                    student_key: "Ravi".into(),
                    ..Default::default()
                },
                StudentInsightRecord::default(),
                StudentInsightRecord {
                    student_key: "Asha".into(),
                    early_stage: "second".into(),
                    ..Default::default()
                },
            ],
            tests: vec![
                test_record("Asha", "Mock 2", "first"),
                test_record("Asha", "Mock 10", ""),
                test_record("Ravi", "Mock 2", ""),
                test_record("Asha", "Mock 2", "duplicate"),
            ],
            test_wise: vec![TestWiseInsightRecord {
                batch_key: "B1".into(),
                exam_key: "Mock 2".into(),
                ..Default::default()
            }],
            batches: vec![
                BatchInsightRecord {
                    batch_key: "B2".into(),
                    ..Default::default()
                },
                BatchInsightRecord {
                    batch_key: "B1".into(),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn lookups_return_first_match() {
        let snap = snapshot();
        let student = snap.find_student_record("Asha").unwrap();
        assert!(student.early_stage.is_empty());

        let test = snap.find_test_record("Asha", "Mock 2").unwrap();
        assert_eq!(test.focus_text, "first");

        assert!(snap.find_batch_record("B1").is_some());
        assert!(snap.find_test_wise_record("B1", "Mock 2").is_some());
    }

    #[test]
    fn lookups_are_exact_and_case_sensitive() {
        let snap = snapshot();
        assert!(snap.find_student_record("asha").is_none());
        assert!(snap.find_student_record("Asha ").is_none());
        assert!(snap.find_test_record("Asha", "mock 2").is_none());
        assert!(snap.find_test_wise_record("B1", "Mock 10").is_none());
        assert!(snap.find_batch_record("B3").is_none());
    }

    #[test]
    fn distinct_student_keys_skip_empty_and_keep_order() {
        assert_eq!(snapshot().distinct_student_keys(), vec!["Asha", "Ravi"]);
    }

    #[test]
    fn exam_keys_lexicographic() {
        let snap = snapshot();
        assert_eq!(
            snap.distinct_exam_keys(ExamOrder::Lexicographic),
            vec!["Mock 10", "Mock 2"]
        );
    }

    #[test]
    fn exam_keys_numeric() {
        let snap = InsightSnapshot {
            tests: vec![
                test_record("a", "10", ""),
                test_record("a", "2", ""),
                test_record("b", "10", ""),
                test_record("b", "final", ""),
                test_record("b", "1", ""),
            ],
            ..Default::default()
        };
        assert_eq!(
            snap.distinct_exam_keys(ExamOrder::Numeric),
            vec!["1", "2", "10", "final"]
        );
        assert_eq!(
            snap.distinct_exam_keys(ExamOrder::Lexicographic),
            vec!["1", "10", "2", "final"]
        );
    }

    #[test]
    fn batch_keys_sorted() {
        assert_eq!(snapshot().distinct_batch_keys(), vec!["B1", "B2"]);
    }

    #[test]
    fn exam_order_parse() {
        assert_eq!("numeric".parse::<ExamOrder>().unwrap(), ExamOrder::Numeric);
        assert_eq!(
            "Lexicographic".parse::<ExamOrder>().unwrap(),
            ExamOrder::Lexicographic
        );
        assert!("random".parse::<ExamOrder>().is_err());
        assert_eq!(ExamOrder::default().to_string(), "lexicographic");
    }

    #[test]
    fn from_rows_builds_all_collections() {
        let row = |pairs: &[(&str, &str)]| -> FieldMap {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        let snap = InsightSnapshot::from_rows(
            &[row(&[("student_name", "Asha")])],
            &[row(&[("student_name", "Asha"), ("exam_name", "Mock 1")])],
            &[],
            &[row(&[("batch_id", "B1")])],
        );
        assert_eq!(snap.students.len(), 1);
        assert_eq!(snap.tests[0].exam_key, "Mock 1");
        assert!(snap.test_wise.is_empty());
        assert_eq!(snap.batches[0].batch_key, "B1");
        assert!(!snap.is_empty());
        assert!(InsightSnapshot::default().is_empty());
    }

    #[test]
    fn store_replace_keeps_outstanding_readers_consistent() {
        let store = SnapshotStore::new(snapshot());
        let before = store.current();

        let previous = store.replace(InsightSnapshot::default());
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.students.len(), 4);
        assert!(store.current().is_empty());
    }

    #[test]
    fn store_reload_returns_the_loaded_snapshot() {
        let store = SnapshotStore::new(InsightSnapshot::default());
        let reloaded = store.reload(|| Ok::<_, String>(snapshot())).unwrap();
        assert!(Arc::ptr_eq(&reloaded, &store.current()));

        store.replace(InsightSnapshot::default());
        assert_eq!(reloaded.students.len(), 4);
        assert!(store.current().is_empty());
    }

    #[test]
    fn store_reload_failure_keeps_previous() {
        let store = SnapshotStore::new(snapshot());
        let result = store.reload(|| Err::<InsightSnapshot, _>("disk on fire".to_string()));
        assert!(result.is_err());
        assert_eq!(store.current().students.len(), 4);

        let reloaded = store
            .reload(|| Ok::<_, String>(InsightSnapshot::default()))
            .unwrap();
        assert!(reloaded.is_empty());
    }
}
