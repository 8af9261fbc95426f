//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;

use examlens_core::config::{load_config_from, ExamlensConfig};
use examlens_core::loader::load_snapshot;
use examlens_core::repository::InsightSnapshot;

pub mod init;
pub mod insight;
pub mod list;
pub mod students;

/// Where to find configuration and record files, from the global flags.
pub struct DataSource {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl DataSource {
    /// Resolve the configuration and load one snapshot of the record files.
    pub fn load(&self) -> Result<(ExamlensConfig, InsightSnapshot)> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }

        let snapshot = load_snapshot(&config.data_dir, &config.files).map_err(|e| {
            let context = if e.path() == config.data_dir.as_path() {
                "no insight records to load (set data_dir in examlens.toml, EXAMLENS_DATA_DIR or --data-dir)"
            } else {
                "failed to load insight records"
            };
            anyhow::Error::new(e).context(context)
        })?;
        Ok((config, snapshot))
    }
}

/// Reject formats a command does not support.
pub(crate) fn check_format(format: &str, supported: &[&str]) -> Result<()> {
    if supported.contains(&format) {
        Ok(())
    } else {
        anyhow::bail!(
            "unknown format '{format}' (expected one of: {})",
            supported.join(", ")
        )
    }
}
