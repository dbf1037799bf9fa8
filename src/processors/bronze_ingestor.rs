use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::models::{BronzeBatch, Provenance};
use crate::processors::SchemaValidator;
use crate::readers::BatchReader;
use crate::settings::PipelineConfig;
use crate::utils::{git_revision, sha256_file, validate_batch_id};
use crate::writers::{bronze_to_batch, ParquetWriter};

pub struct BronzeIngestor<'a> {
    config: &'a PipelineConfig,
    reader: BatchReader,
}

impl<'a> BronzeIngestor<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            reader: BatchReader::new(),
        }
    }

    /// Read `input/batch_{id}.csv` and attach provenance.
    ///
    /// The raw header must carry exactly the raw columns.
    pub fn prepare(&self, batch_id: &str) -> Result<BronzeBatch> {
        validate_batch_id(batch_id)?;

        let source = self.config.paths.input_batch(batch_id);
        let raw = self.reader.read_batch(&source)?;
        SchemaValidator::new(&self.config.limits).validate_raw_columns(&raw.headers)?;

        let provenance = Provenance {
            source_path: source.display().to_string(),
            source_sha: sha256_file(&source)?,
            git_commit_hash: git_revision(self.config.paths.root()),
            ingested_at: Utc::now().naive_utc(),
        };

        tracing::info!(
            "Read {} raw rows from {} (sha256 {})",
            raw.observations.len(),
            source.display(),
            provenance.source_sha
        );

        Ok(BronzeBatch::new(batch_id, raw.observations, provenance))
    }

    /// Ingest one batch and persist it as `bronze/batch_{id}.parquet`,
    /// replacing any earlier artifact for the same id
    pub fn ingest(&self, batch_id: &str, writer: &ParquetWriter) -> Result<(PathBuf, usize)> {
        let bronze = self.prepare(batch_id)?;
        if bronze.is_empty() {
            tracing::warn!("Batch {} has a header but no rows", batch_id);
        }
        let batch = bronze_to_batch(&bronze)?;
        SchemaValidator::new(&self.config.limits).validate_bronze(&batch)?;

        let path = self.config.paths.bronze_batch(batch_id);
        if path.exists() {
            tracing::info!("Replacing existing bronze artifact {}", path.display());
        }
        writer.write_batch(&batch, &path)?;

        Ok((path, bronze.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::processors::{Tier, ValidationRule};
    use tempfile::TempDir;

    fn write_input(config: &PipelineConfig, batch_id: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&config.paths.input)?;
        std::fs::write(config.paths.input_batch(batch_id), contents)?;
        Ok(())
    }

    #[test]
    fn test_prepare_attaches_provenance() -> Result<()> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::with_root(dir.path());
        write_input(
            &config,
            "01",
            "date,meantemp,humidity,wind_speed,meanpressure\n2013-01-01,10.0,84.5,0.0,1015.666667\n",
        )?;

        let bronze = BronzeIngestor::new(&config).prepare("01")?;

        assert_eq!(bronze.batch_id, "01");
        assert_eq!(bronze.len(), 1);
        assert!(bronze.provenance.source_path.ends_with("batch_01.csv"));
        assert_eq!(bronze.provenance.source_sha.len(), 64);
        Ok(())
    }

    #[test]
    fn test_header_only_batch_ingests_empty_table() -> Result<()> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::with_root(dir.path());
        write_input(&config, "02", "date,meantemp,humidity,wind_speed,meanpressure\n")?;

        let (path, rows) = BronzeIngestor::new(&config).ingest("02", &ParquetWriter::new())?;

        assert_eq!(rows, 0);
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_extra_input_column_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::with_root(dir.path());
        write_input(
            &config,
            "01",
            "date,meantemp,humidity,wind_speed,meanpressure,station\n2013-01-01,10.0,84.5,0.0,1015.0,DEL\n",
        )?;

        let result = BronzeIngestor::new(&config).ingest("01", &ParquetWriter::new());

        match result {
            Err(PipelineError::Schema(v)) => {
                assert_eq!(v.tier, Tier::Bronze);
                assert_eq!(v.rule, ValidationRule::Columns);
            }
            other => panic!("expected columns violation, got {:?}", other),
        }
        assert!(!config.paths.bronze_batch("01").exists());
        Ok(())
    }

    #[test]
    fn test_missing_batch_is_reported() -> Result<()> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::with_root(dir.path());

        let result = BronzeIngestor::new(&config).prepare("07");

        match result {
            Err(PipelineError::MissingInput { path }) => {
                assert_eq!(path, config.paths.input_batch("07"));
            }
            other => panic!("expected missing input, got {:?}", other),
        }
        Ok(())
    }
}
