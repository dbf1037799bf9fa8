//! Arrow schemas of the persisted tiers.
//!
//! Writers build batches against these; the schema validator compares
//! column names and data types against them (nullability is left to the
//! missing-value rule).

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};

use crate::models::Measure;
use crate::utils::constants::*;

/// Columns of a raw input batch, in canonical order
pub const RAW_COLUMNS: [&str; 5] = [
    COL_DATE,
    COL_MEANTEMP,
    COL_HUMIDITY,
    COL_WIND_SPEED,
    COL_MEANPRESSURE,
];

/// Gold columns with the measurement whose bounds apply to them
pub const GOLD_FEATURE_COLUMNS: [(&str, Measure); 11] = [
    (COL_MEANTEMP_TODAY, Measure::MeanTemp),
    (COL_MEANTEMP_LAG_1, Measure::MeanTemp),
    (COL_MEANTEMP_LAG_7, Measure::MeanTemp),
    (COL_MEANTEMP_ROLL_7, Measure::MeanTemp),
    (COL_HUMIDITY_TODAY, Measure::Humidity),
    (COL_HUMIDITY_LAG_1, Measure::Humidity),
    (COL_HUMIDITY_ROLL_7, Measure::Humidity),
    (COL_MEANPRESSURE_TODAY, Measure::MeanPressure),
    (COL_MEANPRESSURE_LAG_1, Measure::MeanPressure),
    (COL_MEANPRESSURE_ROLL_7, Measure::MeanPressure),
    (COL_TARGET, Measure::MeanTemp),
];

pub fn bronze_schema() -> SchemaRef {
    let mut fields = vec![Field::new(COL_DATE, DataType::Utf8, false)];
    fields.extend(
        Measure::ALL
            .iter()
            .map(|m| Field::new(m.column(), DataType::Float64, true)),
    );
    fields.extend([
        Field::new(COL_SOURCE_PATH, DataType::Utf8, false),
        Field::new(COL_SOURCE_SHA, DataType::Utf8, false),
        Field::new(COL_GIT_COMMIT_HASH, DataType::Utf8, true),
        Field::new(
            COL_INGESTED_AT,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
    ]);

    Arc::new(Schema::new(fields))
}

pub fn silver_schema() -> SchemaRef {
    let mut fields = vec![Field::new(COL_DATE, DataType::Date32, false)];
    fields.extend(
        Measure::ALL
            .iter()
            .map(|m| Field::new(m.column(), DataType::Float64, false)),
    );

    Arc::new(Schema::new(fields))
}

pub fn gold_schema() -> SchemaRef {
    let mut fields = vec![Field::new(COL_DATE, DataType::Date32, false)];
    fields.extend(
        GOLD_FEATURE_COLUMNS
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, false)),
    );

    Arc::new(Schema::new(fields))
}
