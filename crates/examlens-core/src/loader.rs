//! Record file loader.
//!
//! Reads the four delimiter-separated insight files from a data directory.
//! The header row names the fields and every cell is kept as text.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::model::FieldMap;
use crate::repository::InsightSnapshot;

/// File names of the four record files inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFiles {
    #[serde(default = "default_students_file")]
    pub students: String,
    #[serde(default = "default_tests_file")]
    pub tests: String,
    #[serde(default = "default_test_wise_file")]
    pub test_wise: String,
    #[serde(default = "default_batches_file")]
    pub batches: String,
}

fn default_students_file() -> String {
    "student_specific_insights.csv".to_string()
}
fn default_tests_file() -> String {
    "test_insights.csv".to_string()
}
fn default_test_wise_file() -> String {
    "test_wise_insights.csv".to_string()
}
fn default_batches_file() -> String {
    "batch_insights.csv".to_string()
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            students: default_students_file(),
            tests: default_tests_file(),
            test_wise: default_test_wise_file(),
            batches: default_batches_file(),
        }
    }
}

/// Read one record file into field mappings, one per non-blank row.
///
/// Rows shorter than the header leave their trailing fields absent.
pub fn read_rows(path: &Path) -> Result<Vec<FieldMap>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row: FieldMap = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Load all four record files from `data_dir` into a snapshot.
pub fn load_snapshot(data_dir: &Path, files: &DataFiles) -> Result<InsightSnapshot, LoadError> {
    if !data_dir.is_dir() {
        return Err(LoadError::MissingDataDir(data_dir.to_path_buf()));
    }

    let students = read_rows(&data_dir.join(&files.students))?;
    let tests = read_rows(&data_dir.join(&files.tests))?;
    let test_wise = read_rows(&data_dir.join(&files.test_wise))?;
    let batches = read_rows(&data_dir.join(&files.batches))?;

    let snapshot = InsightSnapshot::from_rows(&students, &tests, &test_wise, &batches);
    tracing::info!(
        students = snapshot.students.len(),
        tests = snapshot.tests.len(),
        test_wise = snapshot.test_wise.len(),
        batches = snapshot.batches.len(),
        "loaded insight records from {}",
        data_dir.display()
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_dataset(dir: &Path) {
        std::fs::write(
            dir.join("student_specific_insights.csv"),
            "id,student_name,batch_id,early_stage,midcourse_stage,preexam_stage,created_at,updated_at\n\
             1,Asha,B1,\"SUP Score (Score Uplift Potential): 45\n\nWhat will go wrong\n* Algebra weak\n\nWhat exactly to fix\n* Drill algebra\n\nSUP Score (Score Uplift Potential): 45\",,,2024-01-01,2024-01-01\n\
             \n\
             2,Ravi,B1,,,\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("test_insights.csv"),
            "id,student_name,batch_id,exam_name,i_focus,i_study\n1,Asha,B1,Mock 1,\"- Algebra\n- RC\",None\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("test_wise_insights.csv"),
            "id,batch_id,exam_name,focus,steady\n1,B1,Mock 1,\"Algebra\nRC\",Vocabulary\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("batch_insights.csv"),
            "\u{feff}id,batch_id,early_stage,midcourse_stage,preexam_stage\n1,B1,,,\n",
        )
        .unwrap();
    }

    #[test]
    fn load_full_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());

        let snap = load_snapshot(dir.path(), &DataFiles::default()).unwrap();
        assert_eq!(snap.students.len(), 2);
        assert!(snap.students[0].early_stage.contains("What will go wrong\n* Algebra weak"));
        assert_eq!(snap.students[1].student_key, "Ravi");
        assert!(snap.students[1].pre_exam_stage.is_empty());
        assert_eq!(snap.tests[0].focus_text, "- Algebra\n- RC");
        assert_eq!(snap.tests[0].study_text, "None");
        assert_eq!(snap.test_wise[0].steady_text, "Vocabulary");
        assert_eq!(snap.batches[0].batch_key, "B1");
    }

    #[test]
    fn ragged_rows_leave_fields_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "a,b,c\n1\n1,2,3\n").unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a").map(String::as_str), Some("1"));
        assert!(rows[0].get("c").is_none());
        assert_eq!(rows[1].get("c").map(String::as_str), Some("3"));
    }

    #[test]
    fn missing_directory() {
        let err = load_snapshot(Path::new("/definitely/not/here"), &DataFiles::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingDataDir(_)));
        assert!(err.to_string().contains("data directory not found"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        std::fs::remove_file(dir.path().join("test_wise_insights.csv")).unwrap();

        let err = load_snapshot(dir.path(), &DataFiles::default()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.path().ends_with("test_wise_insights.csv"));
    }

    #[test]
    fn custom_file_names() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        std::fs::rename(
            dir.path().join("batch_insights.csv"),
            dir.path().join("batches_v2.csv"),
        )
        .unwrap();

        let files = DataFiles {
            batches: "batches_v2.csv".into(),
            ..DataFiles::default()
        };
        let snap = load_snapshot(dir.path(), &files).unwrap();
        assert_eq!(snap.batches.len(), 1);
    }
}
