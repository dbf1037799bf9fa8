use std::path::PathBuf;

use crate::error::{PipelineError, Result};
use crate::models::GoldFeatureSet;
use crate::processors::gold_builder::GOLD_MIN_SILVER_ROWS;
use crate::processors::{BronzeIngestor, GoldBuilder, SchemaValidator, SilverBuilder, SilverReport, Tier};
use crate::readers::{silver_from_batch, ParquetReader};
use crate::settings::PipelineConfig;
use crate::utils::list_bronze_batches;
use crate::writers::{gold_to_batch, silver_to_batch, ParquetWriter};

/// A persisted artifact and its row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub tier: Tier,
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub bronze: StageOutput,
    pub silver: StageOutput,
    pub silver_report: SilverReport,
    pub gold: StageOutput,
}

/// Stage runners over one project root.
///
/// Every stage validates its output before persisting it and reads its
/// upstream artifacts as read-only inputs.
pub struct Pipeline {
    config: PipelineConfig,
    reader: ParquetReader,
    writer: ParquetWriter,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let writer = ParquetWriter::from_settings(&config.output)?;
        Ok(Self {
            config,
            reader: ParquetReader::new(),
            writer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn validator(&self) -> SchemaValidator<'_> {
        SchemaValidator::new(&self.config.limits)
    }

    /// Raw batch to `bronze/batch_{id}.parquet`
    pub fn ingest(&self, batch_id: &str) -> Result<StageOutput> {
        tracing::info!("Ingesting batch {}", batch_id);
        let (path, rows) = BronzeIngestor::new(&self.config).ingest(batch_id, &self.writer)?;

        Ok(StageOutput {
            tier: Tier::Bronze,
            path,
            rows,
        })
    }

    /// Rebuild `silver/silver.parquet` from every bronze batch
    pub fn build_silver(&self) -> Result<(StageOutput, SilverReport)> {
        let observations = self
            .reader
            .read_all_bronze(&self.config.paths.bronze, &self.validator())?;
        let (records, report) = SilverBuilder::new(&self.config.limits).build(&observations)?;

        let batch = silver_to_batch(&records)?;
        self.validator().validate_silver(&batch)?;

        let path = self.config.paths.silver_table();
        self.writer.write_batch(&batch, &path)?;

        Ok((
            StageOutput {
                tier: Tier::Silver,
                path,
                rows: records.len(),
            },
            report,
        ))
    }

    /// Rebuild the gold feature table from the silver artifact
    pub fn build_gold(&self) -> Result<StageOutput> {
        let silver_batch = self.reader.read_table(&self.config.paths.silver_table())?;
        self.validator().validate_silver(&silver_batch)?;
        let silver = silver_from_batch(&silver_batch)?;

        let builder = GoldBuilder::new();
        let records = builder.build(&silver);
        if records.is_empty() {
            return Err(PipelineError::InsufficientHistory {
                rows: silver.len(),
                required: GOLD_MIN_SILVER_ROWS,
            });
        }

        let batch = gold_to_batch(&records)?;
        self.validator().validate_gold(&batch)?;

        let path = self.config.paths.gold_table(builder.feature_set().name());
        self.writer.write_batch(&batch, &path)?;
        tracing::info!(
            "Gold {}: {} rows from {} silver days",
            builder.feature_set(),
            records.len(),
            silver.len()
        );

        Ok(StageOutput {
            tier: Tier::Gold,
            path,
            rows: records.len(),
        })
    }

    /// Ingest one batch, then rebuild silver and gold
    pub fn run(&self, batch_id: &str) -> Result<RunSummary> {
        let bronze = self.ingest(batch_id)?;
        let (silver, silver_report) = self.build_silver()?;
        let gold = self.build_gold()?;

        Ok(RunSummary {
            bronze,
            silver,
            silver_report,
            gold,
        })
    }

    /// Re-validate the persisted artifacts of one tier
    pub fn validate_tier(&self, tier: Tier) -> Result<Vec<StageOutput>> {
        let paths = match tier {
            Tier::Bronze => {
                let batches = list_bronze_batches(&self.config.paths.bronze)?;
                if batches.is_empty() {
                    return Err(PipelineError::MissingInput {
                        path: self.config.paths.bronze.clone(),
                    });
                }
                batches
            }
            Tier::Silver => vec![self.config.paths.silver_table()],
            Tier::Gold => vec![self
                .config
                .paths
                .gold_table(GoldFeatureSet::NextDayTemp.name())],
        };

        paths
            .into_iter()
            .map(|path| {
                let batch = self.reader.read_table(&path)?;
                self.validator().validate(tier, &batch)?;
                tracing::debug!("{} artifact {} is valid", tier, path.display());
                Ok(StageOutput {
                    tier,
                    rows: batch.num_rows(),
                    path,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_silver_without_bronze_is_missing_input() -> Result<()> {
        let dir = TempDir::new()?;
        let pipeline = Pipeline::new(PipelineConfig::with_root(dir.path()))?;

        let result = pipeline.build_silver();
        assert!(matches!(result, Err(PipelineError::MissingInput { .. })));
        Ok(())
    }

    #[test]
    fn test_gold_without_silver_names_expected_path() -> Result<()> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::with_root(dir.path());
        let expected = config.paths.silver_table();
        let pipeline = Pipeline::new(config)?;

        match pipeline.build_gold() {
            Err(PipelineError::MissingInput { path }) => assert_eq!(path, expected),
            other => panic!("expected missing input, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_compression_rejected() {
        let mut config = PipelineConfig::with_root(".");
        config.output.compression = "bogus".to_string();

        assert!(matches!(Pipeline::new(config), Err(PipelineError::Config(_))));
    }
}
