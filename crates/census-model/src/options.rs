//! Configuration options for a preprocessing run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Queensland in the ABS state/territory classification.
pub const DEFAULT_TARGET_STATE: &str = "3";

/// Default input directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Output subdirectory created under the data directory.
pub const PROCESSED_SUBDIR: &str = "processed";

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Directory holding the source tables.
    pub data_dir: PathBuf,
    /// Output directory; `<data_dir>/processed` when unset.
    pub output_dir: Option<PathBuf>,
    /// State code rows are filtered to.
    pub target_state: String,
    /// Also denormalize and write the population fact table.
    pub include_population: bool,
    /// Run every stage but write nothing.
    pub dry_run: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: None,
            target_state: DEFAULT_TARGET_STATE.to_string(),
            include_population: false,
            dry_run: false,
        }
    }
}

impl PipelineOptions {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    #[must_use]
    pub fn with_target_state(mut self, state: impl Into<String>) -> Self {
        self.target_state = state.into();
        self
    }

    #[must_use]
    pub fn with_population(mut self, enable: bool) -> Self {
        self.include_population = enable;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, enable: bool) -> Self {
        self.dry_run = enable;
        self
    }

    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PROCESSED_SUBDIR))
    }
}
