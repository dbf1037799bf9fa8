use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::utils::constants::BRONZE_BATCH_PREFIX;

/// Batch ids are opaque but must name a single file
pub fn validate_batch_id(batch_id: &str) -> Result<()> {
    let valid = !batch_id.trim().is_empty()
        && batch_id != "."
        && batch_id != ".."
        && !batch_id.contains(['/', '\\']);

    if valid {
        Ok(())
    } else {
        Err(PipelineError::Config(format!(
            "Invalid batch id '{}': must be non-empty and contain no path separators",
            batch_id
        )))
    }
}

/// Extract the batch id from a bronze artifact name (`batch_01.parquet` -> `01`)
pub fn batch_id_from_path(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|f| f.to_str())
        .and_then(|name| name.strip_suffix(".parquet"))
        .and_then(|stem| stem.strip_prefix(BRONZE_BATCH_PREFIX))
        .filter(|id| !id.is_empty())
}

/// List bronze batch artifacts in a directory, sorted by file name
pub fn list_bronze_batches(bronze_dir: &Path) -> Result<Vec<PathBuf>> {
    if !bronze_dir.is_dir() {
        return Err(PipelineError::MissingInput {
            path: bronze_dir.to_path_buf(),
        });
    }

    let mut batches = Vec::new();
    for entry in std::fs::read_dir(bronze_dir)? {
        let path = entry?.path();
        if path.is_file() && batch_id_from_path(&path).is_some() {
            batches.push(path);
        }
    }
    batches.sort();

    Ok(batches)
}
