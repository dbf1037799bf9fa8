use crate::error::{PipelineError, Result};
use crate::models::schema::RAW_COLUMNS;
use crate::models::RawObservation;
use std::path::Path;

/// Contents of one raw input batch
#[derive(Debug, Clone)]
pub struct RawBatch {
    /// Header exactly as found in the file
    pub headers: Vec<String>,
    pub observations: Vec<RawObservation>,
    /// Non-empty measurement cells that were not numbers
    pub unparseable_values: usize,
}

pub struct BatchReader {
    delimiter: u8,
}

impl BatchReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Read a raw CSV batch. Measurement cells that do not parse become missing.
    pub fn read_batch(&self, path: &Path) -> Result<RawBatch> {
        if !path.is_file() {
            return Err(PipelineError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let index_of = |column: &str| headers.iter().position(|h| h == column);
        let [date_idx, temp_idx, humidity_idx, wind_idx, pressure_idx] = RAW_COLUMNS.map(index_of);

        let mut observations = Vec::new();
        let mut unparseable_values = 0;

        for record in reader.records() {
            let record = record?;
            let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");
            let mut value = |idx: Option<usize>| {
                let (value, unparseable) = parse_measurement(cell(idx));
                unparseable_values += usize::from(unparseable);
                value
            };

            let meantemp = value(temp_idx);
            let humidity = value(humidity_idx);
            let wind_speed = value(wind_idx);
            let meanpressure = value(pressure_idx);

            observations.push(RawObservation::new(
                cell(date_idx),
                meantemp,
                humidity,
                wind_speed,
                meanpressure,
            ));
        }

        if unparseable_values > 0 {
            tracing::warn!(
                "{}: {} measurement values were not numeric and will be treated as missing",
                path.display(),
                unparseable_values
            );
        }

        Ok(RawBatch {
            headers,
            observations,
            unparseable_values,
        })
    }
}

impl Default for BatchReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one measurement cell; returns the value and whether a non-empty cell was rejected
fn parse_measurement(cell: &str) -> (Option<f64>, bool) {
    if cell.is_empty() {
        return (None, false);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => (Some(value), false),
        _ => (None, true),
    }
}
