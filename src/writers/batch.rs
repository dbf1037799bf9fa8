//! Record-to-Arrow conversion for every tier.

use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::Date32Type;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::models::schema::{bronze_schema, gold_schema, silver_schema};
use crate::models::{BronzeBatch, GoldRecord, Measure, SilverRecord};

pub fn bronze_to_batch(bronze: &BronzeBatch) -> Result<RecordBatch> {
    let rows = bronze.len();
    let provenance = &bronze.provenance;

    let dates: Vec<&str> = bronze.observations.iter().map(|o| o.date.as_str()).collect();

    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(dates))];
    for measure in Measure::ALL {
        let values: Vec<Option<f64>> = bronze
            .observations
            .iter()
            .map(|o| o.value(measure))
            .collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    let ingested_at = provenance.ingested_at.and_utc().timestamp_micros();
    columns.extend([
        Arc::new(StringArray::from(vec![provenance.source_path.as_str(); rows])) as ArrayRef,
        Arc::new(StringArray::from(vec![provenance.source_sha.as_str(); rows])),
        Arc::new(StringArray::from(vec![provenance.git_commit_hash.as_deref(); rows])),
        Arc::new(TimestampMicrosecondArray::from(vec![ingested_at; rows])),
    ]);

    Ok(RecordBatch::try_new(bronze_schema(), columns)?)
}

pub fn silver_to_batch(records: &[SilverRecord]) -> Result<RecordBatch> {
    let dates: Vec<i32> = records
        .iter()
        .map(|r| Date32Type::from_naive_date(r.date))
        .collect();

    let mut columns: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(dates))];
    for measure in Measure::ALL {
        let values: Vec<f64> = records.iter().map(|r| r.value(measure)).collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    Ok(RecordBatch::try_new(silver_schema(), columns)?)
}

pub fn gold_to_batch(records: &[GoldRecord]) -> Result<RecordBatch> {
    let dates: Vec<i32> = records
        .iter()
        .map(|r| Date32Type::from_naive_date(r.date))
        .collect();
    let feature = |f: fn(&GoldRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<f64>>()))
    };

    // Same order as GOLD_FEATURE_COLUMNS
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(dates)),
        feature(|r| r.meantemp_today),
        feature(|r| r.meantemp_lag_1),
        feature(|r| r.meantemp_lag_7),
        feature(|r| r.meantemp_roll_7),
        feature(|r| r.humidity_today),
        feature(|r| r.humidity_lag_1),
        feature(|r| r.humidity_roll_7),
        feature(|r| r.meanpressure_today),
        feature(|r| r.meanpressure_lag_1),
        feature(|r| r.meanpressure_roll_7),
        feature(|r| r.target),
    ];

    Ok(RecordBatch::try_new(gold_schema(), columns)?)
}
