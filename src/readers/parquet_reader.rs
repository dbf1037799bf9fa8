use crate::error::{PipelineError, Result};
use crate::models::{GoldRecord, Measure, RawObservation, SilverRecord};
use crate::processors::SchemaValidator;
use crate::utils::constants::*;
use crate::utils::list_bronze_batches;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

pub struct ParquetReader {
    batch_size: usize,
}

impl ParquetReader {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_READ_BATCH_SIZE,
        }
    }

    /// Read a whole Parquet file into a single batch
    pub fn read_table(&self, path: &Path) -> Result<RecordBatch> {
        if !path.is_file() {
            return Err(PipelineError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let reader = builder.with_batch_size(self.batch_size).build()?;

        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(concat_batches(&schema, &batches)?)
    }

    /// Concatenate the observations of every bronze batch, in batch file order.
    ///
    /// Each batch must pass bronze validation before any of its rows are used;
    /// a violation names the offending file.
    pub fn read_all_bronze(
        &self,
        bronze_dir: &Path,
        validator: &SchemaValidator<'_>,
    ) -> Result<Vec<RawObservation>> {
        let files = list_bronze_batches(bronze_dir)?;
        if files.is_empty() {
            return Err(PipelineError::MissingInput {
                path: bronze_dir.join(format!("{}*.parquet", BRONZE_BATCH_PREFIX)),
            });
        }

        let mut observations = Vec::new();
        for path in &files {
            let batch = self.read_table(path)?;
            validator.validate_bronze(&batch).map_err(|e| match e {
                PipelineError::Schema(mut violation) => {
                    violation.detail = format!("{}: {}", path.display(), violation.detail);
                    PipelineError::Schema(violation)
                }
                other => other,
            })?;
            let batch_observations = observations_from_batch(&batch).map_err(|e| {
                PipelineError::InvalidFormat(format!("{}: {}", path.display(), e))
            })?;
            tracing::debug!(
                "Read {} bronze rows from {}",
                batch_observations.len(),
                path.display()
            );
            observations.extend(batch_observations);
        }

        tracing::info!(
            "Loaded {} bronze rows from {} batches",
            observations.len(),
            files.len()
        );
        Ok(observations)
    }
}

impl Default for ParquetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw observations from a table carrying the raw columns.
///
/// Measurement columns of any type are cast to `Float64`; values that cannot
/// be cast become missing. Date columns may be text or any temporal type.
/// Validated bronze tables are already `Utf8`/`Float64`, so the casts only
/// matter for tables converted outside `read_all_bronze`.
pub fn observations_from_batch(batch: &RecordBatch) -> Result<Vec<RawObservation>> {
    let dates = date_texts(required_column(batch, COL_DATE)?)?;

    let mut measures = Vec::with_capacity(Measure::ALL.len());
    for measure in Measure::ALL {
        let column = cast(required_column(batch, measure.column())?, &DataType::Float64)?;
        let values: Vec<Option<f64>> = column
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        measures.push(values);
    }

    Ok(dates
        .into_iter()
        .enumerate()
        .map(|(row, date)| {
            RawObservation::new(
                date,
                measures[0][row],
                measures[1][row],
                measures[2][row],
                measures[3][row],
            )
        })
        .collect())
}

pub fn silver_from_batch(batch: &RecordBatch) -> Result<Vec<SilverRecord>> {
    let dates = required_dates(batch)?;
    let meantemp = required_floats(batch, COL_MEANTEMP)?;
    let humidity = required_floats(batch, COL_HUMIDITY)?;
    let wind_speed = required_floats(batch, COL_WIND_SPEED)?;
    let meanpressure = required_floats(batch, COL_MEANPRESSURE)?;

    Ok((0..batch.num_rows())
        .map(|i| SilverRecord::new(dates[i], meantemp[i], humidity[i], wind_speed[i], meanpressure[i]))
        .collect())
}

pub fn gold_from_batch(batch: &RecordBatch) -> Result<Vec<GoldRecord>> {
    let dates = required_dates(batch)?;
    let column = |name: &str| required_floats(batch, name);

    let meantemp_today = column(COL_MEANTEMP_TODAY)?;
    let meantemp_lag_1 = column(COL_MEANTEMP_LAG_1)?;
    let meantemp_lag_7 = column(COL_MEANTEMP_LAG_7)?;
    let meantemp_roll_7 = column(COL_MEANTEMP_ROLL_7)?;
    let humidity_today = column(COL_HUMIDITY_TODAY)?;
    let humidity_lag_1 = column(COL_HUMIDITY_LAG_1)?;
    let humidity_roll_7 = column(COL_HUMIDITY_ROLL_7)?;
    let meanpressure_today = column(COL_MEANPRESSURE_TODAY)?;
    let meanpressure_lag_1 = column(COL_MEANPRESSURE_LAG_1)?;
    let meanpressure_roll_7 = column(COL_MEANPRESSURE_ROLL_7)?;
    let target = column(COL_TARGET)?;

    Ok((0..batch.num_rows())
        .map(|i| GoldRecord {
            date: dates[i],
            meantemp_today: meantemp_today[i],
            meantemp_lag_1: meantemp_lag_1[i],
            meantemp_lag_7: meantemp_lag_7[i],
            meantemp_roll_7: meantemp_roll_7[i],
            humidity_today: humidity_today[i],
            humidity_lag_1: humidity_lag_1[i],
            humidity_roll_7: humidity_roll_7[i],
            meanpressure_today: meanpressure_today[i],
            meanpressure_lag_1: meanpressure_lag_1[i],
            meanpressure_roll_7: meanpressure_roll_7[i],
            target: target[i],
        })
        .collect())
}

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PipelineError::InvalidFormat(format!("Missing column '{}'", name)))
}

/// Dates as text; nulls become empty strings and are dropped by the silver build
fn date_texts(column: &ArrayRef) -> Result<Vec<String>> {
    match column.data_type() {
        DataType::Utf8 => Ok(column
            .as_string::<i32>()
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()),
        DataType::LargeUtf8 => Ok(column
            .as_string::<i64>()
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let days = cast(column, &DataType::Date32)?;
            Ok(days
                .as_primitive::<Date32Type>()
                .iter()
                .map(|v| {
                    v.map(|d| Date32Type::to_naive_date(d).format("%Y-%m-%d").to_string())
                        .unwrap_or_default()
                })
                .collect())
        }
        other => Err(PipelineError::InvalidFormat(format!(
            "Unsupported date column type: {}",
            other
        ))),
    }
}

fn required_dates(batch: &RecordBatch) -> Result<Vec<NaiveDate>> {
    let column = required_column(batch, COL_DATE)?;
    let dates = column
        .as_primitive_opt::<Date32Type>()
        .ok_or_else(|| PipelineError::InvalidFormat("Invalid date column type".to_string()))?;

    dates
        .iter()
        .map(|v| {
            v.map(Date32Type::to_naive_date)
                .ok_or_else(|| PipelineError::MissingData("null date".to_string()))
        })
        .collect()
}

fn required_floats(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let column = required_column(batch, name)?;
    let values = column.as_primitive_opt::<Float64Type>().ok_or_else(|| {
        PipelineError::InvalidFormat(format!("Invalid {} column type", name))
    })?;

    if values.null_count() > 0 {
        return Err(PipelineError::MissingData(format!(
            "column '{}' has {} missing values",
            name,
            values.null_count()
        )));
    }
    Ok(values.values().to_vec())
}
