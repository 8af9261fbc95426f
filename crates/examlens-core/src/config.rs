//! examlens configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{EngineSettings, DEFAULT_BATCH_LABEL, DEFAULT_TOTAL_EXAMS};
use crate::loader::DataFiles;
use crate::repository::ExamOrder;

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "EXAMLENS_DATA_DIR";

/// Top-level examlens configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamlensConfig {
    /// Directory holding the four record files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Batch label shown on student profiles.
    #[serde(default = "default_batch_label")]
    pub batch_label: String,
    /// Number of exams in the series.
    #[serde(default = "default_total_exams")]
    pub total_exams: u32,
    /// Sort rule for exam keys.
    #[serde(default)]
    pub exam_order: ExamOrder,
    /// Record file names inside `data_dir`.
    #[serde(default)]
    pub files: DataFiles,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_batch_label() -> String {
    DEFAULT_BATCH_LABEL.to_string()
}
fn default_total_exams() -> u32 {
    DEFAULT_TOTAL_EXAMS
}

impl Default for ExamlensConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            batch_label: default_batch_label(),
            total_exams: default_total_exams(),
            exam_order: ExamOrder::default(),
            files: DataFiles::default(),
        }
    }
}

impl ExamlensConfig {
    /// Query engine settings derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            batch_label: self.batch_label.clone(),
            total_exams: self.total_exams,
            exam_order: self.exam_order,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    expand_vars(s, |name| std::env::var(name).ok())
}

/// Expand `${NAME}` references left to right using `lookup`.
///
/// Substituted values are copied as-is and never re-scanned.
fn expand_vars(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Apply environment overrides using `lookup` to read variables.
fn apply_env_overrides(config: &mut ExamlensConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        config.data_dir = PathBuf::from(dir);
    }
    let raw = config.data_dir.to_string_lossy().into_owned();
    if raw.contains("${") {
        config.data_dir = PathBuf::from(resolve_env_vars(&raw));
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examlens.toml` in the current directory
/// 2. `~/.config/examlens/config.toml`
///
/// `EXAMLENS_DATA_DIR` overrides the data directory.
pub fn load_config() -> Result<ExamlensConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamlensConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examlens.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("using config {}", path.display());
            parse_config_file(&path)?
        }
        None => ExamlensConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Parse one TOML config file.
pub fn parse_config_file(path: &Path) -> Result<ExamlensConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<ExamlensConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examlens"))
}
