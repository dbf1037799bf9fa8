use std::path::Path;

use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::cli::args::{Cli, Commands};
use crate::error::{PipelineError, Result};
use crate::processors::{Pipeline, SilverReport, StageOutput};
use crate::readers::ParquetReader;
use crate::settings::PipelineConfig;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;

pub fn run(cli: Cli) -> Result<()> {
    let mut config = PipelineConfig::load(&cli.root, cli.config.as_deref())?;
    if let Some(compression) = cli.compression {
        config.output.compression = compression;
    }
    tracing::debug!("Project root: {}", config.paths.root().display());

    let quiet = cli.quiet;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Ingest { batch_id } => {
            let pipeline = Pipeline::new(config)?;
            let progress =
                ProgressReporter::new_spinner(&format!("Ingesting batch {}...", batch_id), quiet);
            let bronze = pipeline.ingest(&batch_id)?;
            progress.finish_and_clear();

            print_stage(&bronze);
        }

        Commands::Silver { batch_id } => {
            if let Some(id) = batch_id {
                tracing::info!("Silver rebuild triggered by batch {}", id);
            }
            let pipeline = Pipeline::new(config)?;
            let progress = ProgressReporter::new_spinner("Rebuilding silver...", quiet);
            let (silver, report) = pipeline.build_silver()?;
            progress.finish_and_clear();

            print_silver_report(&report, verbose);
            print_stage(&silver);
        }

        Commands::Gold { batch_id } => {
            if let Some(id) = batch_id {
                tracing::info!("Gold rebuild triggered by batch {}", id);
            }
            let pipeline = Pipeline::new(config)?;
            let progress = ProgressReporter::new_spinner("Rebuilding gold...", quiet);
            let gold = pipeline.build_gold()?;
            progress.finish_and_clear();

            print_stage(&gold);
        }

        Commands::Run { batch_id } => {
            let pipeline = Pipeline::new(config)?;
            let progress =
                ProgressReporter::new_spinner(&format!("Ingesting batch {}...", batch_id), quiet);

            let bronze = pipeline.ingest(&batch_id)?;
            progress.set_message("Rebuilding silver...");
            let (silver, report) = pipeline.build_silver()?;
            progress.set_message("Rebuilding gold...");
            let gold = pipeline.build_gold()?;
            progress.finish_and_clear();

            print_silver_report(&report, verbose);
            print_stage(&bronze);
            print_stage(&silver);
            print_stage(&gold);
        }

        Commands::Validate { tier } => {
            let pipeline = Pipeline::new(config)?;
            let skip_missing = tier.tiers().len() > 1;
            let mut checked = 0;

            for tier in tier.tiers() {
                match pipeline.validate_tier(tier) {
                    Ok(outputs) => {
                        for output in outputs {
                            println!(
                                "✅ {} {} ({} rows)",
                                output.tier,
                                output.path.display(),
                                output.rows
                            );
                            checked += 1;
                        }
                    }
                    Err(PipelineError::MissingInput { path }) if skip_missing => {
                        println!("Skipping {}: nothing at {}", tier, path.display());
                    }
                    Err(e) => return Err(e),
                }
            }

            if checked == 0 {
                return Err(PipelineError::MissingData(
                    "No persisted artifacts to validate".to_string(),
                ));
            }
            println!("All {} artifacts passed validation", checked);
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::from_settings(&config.output)?;
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                print_sample(&file, sample)?;
            }
        }
    }

    Ok(())
}

fn print_stage(output: &StageOutput) {
    tracing::info!("{} artifact holds {} rows", output.tier, output.rows);
    println!(
        "Wrote {}: {}",
        output.tier.to_string().to_lowercase(),
        output.path.display()
    );
}

fn print_silver_report(report: &SilverReport, verbose: bool) {
    if verbose {
        println!("{}", report.summary());
    }
}

fn print_sample(path: &Path, sample: usize) -> Result<()> {
    let batch = ParquetReader::new().read_table(path)?;
    let rows = sample.min(batch.num_rows());

    println!("\nSample Records (showing {} of {}):", rows, batch.num_rows());
    for line in format_rows(&batch, rows)? {
        println!("  {}", line);
    }
    Ok(())
}

/// Render the first `rows` rows as `column=value` lines
fn format_rows(batch: &RecordBatch, rows: usize) -> Result<Vec<String>> {
    let options = FormatOptions::default().with_null("null");
    let formatters = batch
        .columns()
        .iter()
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let schema = batch.schema();

    Ok((0..rows.min(batch.num_rows()))
        .map(|row| {
            schema
                .fields()
                .iter()
                .zip(&formatters)
                .map(|(field, formatter)| format!("{}={}", field.name(), formatter.value(row)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect())
}
