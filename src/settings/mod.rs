//! Pipeline configuration: physical bounds, storage layout and output format.
//!
//! Everything here is passed explicitly into each stage. Defaults match the
//! fixed production values; an optional TOML file may override the limits
//! and output settings, never the storage layout.

pub mod limits;
pub mod paths;

pub use limits::{Bounds, DataLimits};
pub use paths::ProjectPaths;

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{PipelineError, Result};
use crate::utils::constants::{COMPRESSION_SNAPPY, DEFAULT_ROW_GROUP_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputSettings {
    pub compression: String,

    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            compression: COMPRESSION_SNAPPY.to_string(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PipelineConfig {
    #[serde(default)]
    #[validate(nested)]
    pub limits: DataLimits,

    #[serde(default)]
    #[validate(nested)]
    pub output: OutputSettings,

    #[serde(skip)]
    pub paths: ProjectPaths,
}

impl PipelineConfig {
    /// Default configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: ProjectPaths::under(root),
            ..Self::default()
        }
    }

    /// Build the configuration for a project root, optionally overridden by a
    /// TOML settings file.
    pub fn load(root: impl Into<PathBuf>, settings_file: Option<&Path>) -> Result<Self> {
        let mut pipeline_config = match settings_file {
            Some(path) => {
                if !path.exists() {
                    return Err(PipelineError::MissingInput {
                        path: path.to_path_buf(),
                    });
                }
                tracing::debug!("Loading settings from {}", path.display());
                Config::builder()
                    .add_source(File::from(path).format(FileFormat::Toml))
                    .build()?
                    .try_deserialize::<PipelineConfig>()?
            }
            None => PipelineConfig::default(),
        };

        pipeline_config.paths = ProjectPaths::under(root);
        pipeline_config.validate()?;

        Ok(pipeline_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_defaults() -> Result<()> {
        let config = PipelineConfig::load("/tmp/project", None)?;

        assert_eq!(config.limits, DataLimits::default());
        assert_eq!(config.output, OutputSettings::default());
        assert_eq!(config.paths.root, PathBuf::from("/tmp/project"));
        Ok(())
    }

    #[test]
    fn test_load_partial_override() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[limits]")?;
        writeln!(file, "temp_min = -20.0")?;
        writeln!(file, "[output]")?;
        writeln!(file, "compression = \"zstd\"")?;

        let config = PipelineConfig::load(".", Some(file.path()))?;

        assert_eq!(config.limits.temp_min, -20.0);
        assert_eq!(config.limits.temp_max, 60.0);
        assert_eq!(config.output.compression, "zstd");
        assert_eq!(config.output.row_group_size, DEFAULT_ROW_GROUP_SIZE);
        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_limits() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[limits]")?;
        writeln!(file, "temp_min = 70.0")?;

        let result = PipelineConfig::load(".", Some(file.path()));
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_load_missing_settings_file() {
        let result = PipelineConfig::load(".", Some(Path::new("/nonexistent/pipeline.toml")));
        assert!(matches!(result, Err(PipelineError::MissingInput { .. })));
    }
}
