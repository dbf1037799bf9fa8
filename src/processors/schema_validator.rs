use std::collections::{BTreeSet, HashMap};

use arrow::array::{Array, Date32Array, Float64Array};
use arrow::datatypes::{DataType, Date32Type, SchemaRef};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use thiserror::Error;

use crate::error::Result;
use crate::models::schema::{bronze_schema, gold_schema, silver_schema, GOLD_FEATURE_COLUMNS, RAW_COLUMNS};
use crate::models::Measure;
use crate::settings::{Bounds, DataLimits};
use crate::utils::constants::{COL_DATE, COL_INGESTED_AT, COL_SOURCE_PATH, COL_SOURCE_SHA};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Bronze, Tier::Silver, Tier::Gold];
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    Columns,
    DateOrdering,
    Range,
    MissingValues,
}

impl std::fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValidationRule::Columns => "columns",
            ValidationRule::DateOrdering => "date-ordering",
            ValidationRule::Range => "range",
            ValidationRule::MissingValues => "missing-values",
        };
        write!(f, "{}", name)
    }
}

/// The first rule a table failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{tier} validation failed: {rule} rule: {detail}")]
pub struct SchemaViolation {
    pub tier: Tier,
    pub rule: ValidationRule,
    pub detail: String,
}

impl SchemaViolation {
    fn new(tier: Tier, rule: ValidationRule, detail: impl Into<String>) -> Self {
        Self {
            tier,
            rule,
            detail: detail.into(),
        }
    }
}

type RuleResult<T = ()> = std::result::Result<T, SchemaViolation>;

/// Fixed, per-tier rule sets.
///
/// Rules run in the order columns, date-ordering, range, missing-values and
/// stop at the first failure.
pub struct SchemaValidator<'a> {
    limits: &'a DataLimits,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(limits: &'a DataLimits) -> Self {
        Self { limits }
    }

    pub fn validate(&self, tier: Tier, batch: &RecordBatch) -> Result<()> {
        match tier {
            Tier::Bronze => self.validate_bronze(batch),
            Tier::Silver => self.validate_silver(batch),
            Tier::Gold => self.validate_gold(batch),
        }
    }

    /// Header of a raw input batch must be exactly the five raw columns
    pub fn validate_raw_columns(&self, headers: &[String]) -> Result<()> {
        let actual: BTreeSet<&str> = headers.iter().map(|h| h.as_str()).collect();
        let expected: BTreeSet<&str> = RAW_COLUMNS.iter().copied().collect();

        if actual.len() != headers.len() {
            return Err(SchemaViolation::new(
                Tier::Bronze,
                ValidationRule::Columns,
                "input batch header repeats a column name",
            )
            .into());
        }
        describe_column_mismatch(&expected, &actual)
            .map_or(Ok(()), |detail| {
                Err(SchemaViolation::new(Tier::Bronze, ValidationRule::Columns, detail).into())
            })
    }

    pub fn validate_bronze(&self, batch: &RecordBatch) -> Result<()> {
        let tier = Tier::Bronze;
        check_columns(tier, batch, &bronze_schema())?;

        for column in [COL_DATE, COL_SOURCE_PATH, COL_SOURCE_SHA, COL_INGESTED_AT] {
            check_column_populated(tier, batch, column)?;
        }

        Ok(())
    }

    pub fn validate_silver(&self, batch: &RecordBatch) -> Result<()> {
        let tier = Tier::Silver;
        check_columns(tier, batch, &silver_schema())?;

        let dates = date_values(tier, batch)?;
        check_date_sequence(tier, &dates)?;

        for measure in Measure::ALL {
            let values = float_column(tier, batch, measure.column())?;
            check_range(tier, measure.column(), values, self.limits.bounds(measure))?;
        }

        check_no_missing(tier, batch)?;
        Ok(())
    }

    pub fn validate_gold(&self, batch: &RecordBatch) -> Result<()> {
        let tier = Tier::Gold;
        check_columns(tier, batch, &gold_schema())?;

        let dates = date_values(tier, batch)?;
        check_date_sequence(tier, &dates)?;

        for (column, measure) in GOLD_FEATURE_COLUMNS {
            let values = float_column(tier, batch, column)?;
            check_range(tier, column, values, self.limits.bounds(measure))?;
        }

        check_no_missing(tier, batch)?;
        Ok(())
    }
}

/// Dates must be unique, strictly increasing and one day apart.
///
/// Shared by every tier that carries a daily series.
pub fn check_date_sequence(tier: Tier, dates: &[NaiveDate]) -> std::result::Result<(), SchemaViolation> {
    for (row, pair) in dates.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        let step = (curr - prev).num_days();

        let detail = match step {
            1 => continue,
            0 => format!("duplicate date {} at row {}", curr, row + 1),
            s if s < 0 => format!(
                "date {} at row {} is earlier than {}",
                curr,
                row + 1,
                prev
            ),
            s => format!(
                "gap between {} and {} ({} missing days)",
                prev,
                curr,
                s - 1
            ),
        };
        return Err(SchemaViolation::new(tier, ValidationRule::DateOrdering, detail));
    }

    Ok(())
}

fn check_columns(tier: Tier, batch: &RecordBatch, expected: &SchemaRef) -> RuleResult {
    let schema = batch.schema();
    let actual_types: HashMap<&str, &DataType> = schema
        .fields()
        .iter()
        .map(|f| (f.name().as_str(), f.data_type()))
        .collect();

    let actual: BTreeSet<&str> = actual_types.keys().copied().collect();
    let expected_names: BTreeSet<&str> = expected.fields().iter().map(|f| f.name().as_str()).collect();

    if let Some(detail) = describe_column_mismatch(&expected_names, &actual) {
        return Err(SchemaViolation::new(tier, ValidationRule::Columns, detail));
    }

    for field in expected.fields() {
        let actual_type = actual_types[field.name().as_str()];
        if actual_type != field.data_type() {
            return Err(SchemaViolation::new(
                tier,
                ValidationRule::Columns,
                format!(
                    "column '{}' has type {}, expected {}",
                    field.name(),
                    actual_type,
                    field.data_type()
                ),
            ));
        }
    }

    Ok(())
}

fn describe_column_mismatch(expected: &BTreeSet<&str>, actual: &BTreeSet<&str>) -> Option<String> {
    let missing: Vec<&str> = expected.difference(actual).copied().collect();
    let unexpected: Vec<&str> = actual.difference(expected).copied().collect();

    match (missing.is_empty(), unexpected.is_empty()) {
        (true, true) => None,
        (false, true) => Some(format!("missing columns {:?}", missing)),
        (true, false) => Some(format!("unexpected columns {:?}", unexpected)),
        (false, false) => Some(format!(
            "missing columns {:?}, unexpected columns {:?}",
            missing, unexpected
        )),
    }
}

fn float_column<'b>(tier: Tier, batch: &'b RecordBatch, name: &str) -> RuleResult<&'b Float64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| {
            SchemaViolation::new(
                tier,
                ValidationRule::Columns,
                format!("column '{}' is not Float64", name),
            )
        })
}

fn date_values(tier: Tier, batch: &RecordBatch) -> RuleResult<Vec<NaiveDate>> {
    let dates = batch
        .column_by_name(COL_DATE)
        .and_then(|c| c.as_any().downcast_ref::<Date32Array>())
        .ok_or_else(|| {
            SchemaViolation::new(tier, ValidationRule::Columns, "column 'date' is not Date32")
        })?;

    dates
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(Date32Type::to_naive_date).ok_or_else(|| {
                SchemaViolation::new(
                    tier,
                    ValidationRule::DateOrdering,
                    format!("date missing at row {}", row),
                )
            })
        })
        .collect()
}

/// Present values only; null and NaN cells are left to the missing-value rule
fn check_range(tier: Tier, column: &str, values: &Float64Array, bounds: Bounds) -> RuleResult {
    let mut violations = values
        .iter()
        .enumerate()
        .filter_map(|(row, value)| value.map(|v| (row, v)))
        .filter(|(_, v)| !v.is_nan() && !bounds.contains(*v));

    if let Some((row, value)) = violations.next() {
        let count = 1 + violations.count();
        return Err(SchemaViolation::new(
            tier,
            ValidationRule::Range,
            format!(
                "column '{}' value {} at row {} outside [{}, {}] ({} values out of range)",
                column, value, row, bounds.min, bounds.max, count
            ),
        ));
    }

    Ok(())
}

fn check_column_populated(tier: Tier, batch: &RecordBatch, column: &str) -> RuleResult {
    let nulls = batch
        .column_by_name(column)
        .map(|c| c.null_count())
        .unwrap_or_default();

    if nulls > 0 {
        return Err(SchemaViolation::new(
            tier,
            ValidationRule::MissingValues,
            format!("column '{}' has {} missing values", column, nulls),
        ));
    }
    Ok(())
}

fn check_no_missing(tier: Tier, batch: &RecordBatch) -> RuleResult {
    let schema = batch.schema();
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let nans = column
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|values| values.iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or_default();
        let missing = column.null_count() + nans;

        if missing > 0 {
            return Err(SchemaViolation::new(
                tier,
                ValidationRule::MissingValues,
                format!("column '{}' has {} missing values", field.name(), missing),
            ));
        }
    }

    Ok(())
}
