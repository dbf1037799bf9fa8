//! Bronze to silver: one row per calendar day, every value present and in range.
//!
//! The build runs in a fixed order:
//! 1. coerce dates, dropping records whose date does not parse
//! 2. keep the last record per day (concatenation order)
//! 3. sort by date
//! 4. reindex onto every day between the first and last date
//! 5. treat non-finite measurements as missing
//! 6. invalidate values outside the physical bounds
//! 7. fill gaps per column by linear interpolation, nearest value at the ends
//!
//! Out-of-range values are removed before interpolation so they never leak
//! into the values filled around them.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{PipelineError, Result};
use crate::models::{Measure, RawObservation, SilverRecord};
use crate::settings::{Bounds, DataLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnReport {
    pub measure: Measure,
    /// Values set to missing for lying outside the bounds
    pub out_of_range: usize,
    /// Missing cells filled by interpolation or at the series ends
    pub filled: usize,
}

/// What the silver build did to its input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SilverReport {
    pub input_rows: usize,
    pub unparseable_dates: usize,
    pub duplicates_superseded: usize,
    pub days_inserted: usize,
    pub columns: Vec<ColumnReport>,
    pub output_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl SilverReport {
    pub fn column(&self, measure: Measure) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.measure == measure)
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Silver Build Report ===\n");
        summary.push_str(&format!("Bronze rows: {}\n", self.input_rows));
        summary.push_str(&format!(
            "Dropped (unparseable date): {}\n",
            self.unparseable_dates
        ));
        summary.push_str(&format!(
            "Superseded duplicates: {}\n",
            self.duplicates_superseded
        ));
        summary.push_str(&format!("Days inserted: {}\n", self.days_inserted));

        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            summary.push_str(&format!(
                "Silver rows: {} ({} to {})\n",
                self.output_rows, first, last
            ));
        }

        for column in &self.columns {
            summary.push_str(&format!(
                "  {:<13} out of range: {:>4}, filled: {:>4}\n",
                column.measure.column(),
                column.out_of_range,
                column.filled
            ));
        }

        summary
    }
}

pub struct SilverBuilder<'a> {
    limits: &'a DataLimits,
}

impl<'a> SilverBuilder<'a> {
    pub fn new(limits: &'a DataLimits) -> Self {
        Self { limits }
    }

    /// Build the canonical daily series from concatenated bronze observations
    pub fn build(&self, observations: &[RawObservation]) -> Result<(Vec<SilverRecord>, SilverReport)> {
        let mut report = SilverReport {
            input_rows: observations.len(),
            ..SilverReport::default()
        };

        let by_day = latest_per_day(observations, &mut report);
        let (dates, rows) = reindex_daily(&by_day).ok_or_else(|| {
            PipelineError::MissingData("no bronze record has a parseable date".to_string())
        })?;
        report.days_inserted = dates.len() - by_day.len();

        let mut columns = Vec::with_capacity(Measure::ALL.len());
        for measure in Measure::ALL {
            let mut values: Vec<Option<f64>> = rows
                .iter()
                .map(|row| row.and_then(|o| o.value(measure)).filter(|v| v.is_finite()))
                .collect();

            let out_of_range = invalidate_out_of_range(&mut values, self.limits.bounds(measure));
            let filled = interpolate_gaps(&mut values).ok_or(PipelineError::UnrecoverableGap {
                column: measure.column(),
            })?;
            if out_of_range + filled > 0 {
                tracing::debug!(
                    "{}: {} values out of range, {} cells filled",
                    measure,
                    out_of_range,
                    filled
                );
            }

            report.columns.push(ColumnReport {
                measure,
                out_of_range,
                filled,
            });
            columns.push(values);
        }

        let records: Vec<SilverRecord> = dates
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let value = |c: usize| columns[c][i].unwrap_or(f64::NAN);
                SilverRecord::new(*date, value(0), value(1), value(2), value(3))
            })
            .collect();

        report.output_rows = records.len();
        report.first_date = dates.first().copied();
        report.last_date = dates.last().copied();

        tracing::info!(
            "Silver build: {} bronze rows -> {} days ({} inserted, {} duplicates superseded)",
            report.input_rows,
            report.output_rows,
            report.days_inserted,
            report.duplicates_superseded
        );

        Ok((records, report))
    }
}

/// Build the silver series, discarding the report
pub fn build_silver(observations: &[RawObservation], limits: &DataLimits) -> Result<Vec<SilverRecord>> {
    SilverBuilder::new(limits)
        .build(observations)
        .map(|(records, _)| records)
}

/// Last record wins per day; the map keeps days sorted
fn latest_per_day<'o>(
    observations: &'o [RawObservation],
    report: &mut SilverReport,
) -> BTreeMap<NaiveDate, &'o RawObservation> {
    let mut by_day = BTreeMap::new();

    for observation in observations {
        match observation.calendar_day() {
            Some(day) => {
                if by_day.insert(day, observation).is_some() {
                    report.duplicates_superseded += 1;
                }
            }
            None => {
                tracing::debug!("Dropping record with unparseable date '{}'", observation.date);
                report.unparseable_dates += 1;
            }
        }
    }

    if report.unparseable_dates > 0 {
        tracing::warn!(
            "Dropped {} records with unparseable dates",
            report.unparseable_dates
        );
    }

    by_day
}

/// Every day from the first to the last observed date, with the observation
/// for that day if there was one. `None` when there are no days at all.
#[allow(clippy::type_complexity)]
fn reindex_daily<'o>(
    by_day: &BTreeMap<NaiveDate, &'o RawObservation>,
) -> Option<(Vec<NaiveDate>, Vec<Option<&'o RawObservation>>)> {
    let (&first, _) = by_day.first_key_value()?;
    let (&last, _) = by_day.last_key_value()?;

    let dates: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();
    let rows = dates.iter().map(|d| by_day.get(d).copied()).collect();

    Some((dates, rows))
}

/// Set values outside the inclusive bounds to missing; returns how many
fn invalidate_out_of_range(values: &mut [Option<f64>], bounds: Bounds) -> usize {
    let mut invalidated = 0;
    for value in values.iter_mut() {
        if matches!(value, Some(v) if !bounds.contains(*v)) {
            *value = None;
            invalidated += 1;
        }
    }
    invalidated
}

/// Fill missing values in place.
///
/// Interior gaps are interpolated linearly between the nearest present
/// neighbours by position; leading and trailing gaps copy the nearest present
/// value. Returns the number of filled cells, or `None` when no value is
/// present to fill from.
pub fn interpolate_gaps(values: &mut [Option<f64>]) -> Option<usize> {
    let anchors: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    let (&first, &last) = (anchors.first()?, anchors.last()?);
    let mut filled = 0;

    let first_value = values[first];
    for value in &mut values[..first] {
        *value = first_value;
        filled += 1;
    }

    let last_value = values[last];
    for value in &mut values[last + 1..] {
        *value = last_value;
        filled += 1;
    }

    for pair in anchors.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if right - left < 2 {
            continue;
        }

        let (y0, y1) = match (values[left], values[right]) {
            (Some(y0), Some(y1)) => (y0, y1),
            _ => continue,
        };
        let slope = (y1 - y0) / (right - left) as f64;

        for i in left + 1..right {
            values[i] = Some(slope * (i - left) as f64 + y0);
            filled += 1;
        }
    }

    Some(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 1, d).unwrap()
    }

    fn obs(date: &str, temp: Option<f64>) -> RawObservation {
        RawObservation::new(date, temp, Some(80.0), Some(5.0), Some(1015.0))
    }

    fn build(observations: &[RawObservation]) -> Result<(Vec<SilverRecord>, SilverReport)> {
        let limits = DataLimits::default();
        SilverBuilder::new(&limits).build(observations)
    }

    fn temps(records: &[SilverRecord]) -> Vec<f64> {
        records.iter().map(|r| r.meantemp).collect()
    }

    #[test]
    fn test_contiguous_input_is_unchanged() -> Result<()> {
        let input = vec![
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-02", Some(7.4)),
            obs("2013-01-03", Some(7.166667)),
        ];

        let (records, report) = build(&input)?;

        assert_eq!(temps(&records), vec![10.0, 7.4, 7.166667]);
        assert_eq!(report.days_inserted, 0);
        assert_eq!(report.duplicates_superseded, 0);
        assert!(report.columns.iter().all(|c| c.filled == 0 && c.out_of_range == 0));
        Ok(())
    }

    #[test]
    fn test_last_write_wins_per_day() -> Result<()> {
        let input = vec![
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-02", Some(20.0)),
            obs("2013-01-03", Some(12.0)),
            // Later batch re-delivers day 2
            obs("2013-01-02", Some(25.0)),
        ];

        let (records, report) = build(&input)?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].date, day(2));
        assert_eq!(records[1].meantemp, 25.0);
        assert_eq!(report.duplicates_superseded, 1);
        Ok(())
    }

    #[test]
    fn test_missing_day_is_interpolated() -> Result<()> {
        let input = vec![obs("2013-01-01", Some(10.0)), obs("2013-01-03", Some(14.0))];

        let (records, report) = build(&input)?;

        assert_eq!(
            records.iter().map(|r| r.date).collect::<Vec<_>>(),
            vec![day(1), day(2), day(3)]
        );
        assert_eq!(records[1].meantemp, 12.0);
        // Other columns are carried across the inserted day as well
        assert_eq!(records[1].humidity, 80.0);
        assert_eq!(report.days_inserted, 1);
        assert_eq!(report.column(Measure::MeanTemp).unwrap().filled, 1);
        Ok(())
    }

    #[test]
    fn test_leading_gap_takes_nearest_value() -> Result<()> {
        let input = vec![
            obs("2013-01-01", None),
            obs("2013-01-02", Some(10.0)),
            obs("2013-01-03", Some(12.0)),
        ];

        let (records, _) = build(&input)?;

        assert_eq!(temps(&records), vec![10.0, 10.0, 12.0]);
        Ok(())
    }

    #[test]
    fn test_trailing_gap_takes_nearest_value() -> Result<()> {
        let input = vec![
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-02", Some(12.0)),
            obs("2013-01-03", None),
            obs("2013-01-04", None),
        ];

        let (records, _) = build(&input)?;

        assert_eq!(temps(&records), vec![10.0, 12.0, 12.0, 12.0]);
        Ok(())
    }

    #[test]
    fn test_out_of_range_removed_before_interpolation() -> Result<()> {
        let input = vec![
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-02", Some(999.0)),
            obs("2013-01-03", Some(14.0)),
        ];

        let (records, report) = build(&input)?;

        assert_eq!(records[1].meantemp, 12.0);
        let column = report.column(Measure::MeanTemp).unwrap();
        assert_eq!(column.out_of_range, 1);
        assert_eq!(column.filled, 1);
        Ok(())
    }

    #[test]
    fn test_bounds_are_inclusive() -> Result<()> {
        let input = vec![
            RawObservation::new("2013-01-01", Some(-10.0), Some(0.0), Some(0.0), Some(900.0)),
            RawObservation::new("2013-01-02", Some(60.0), Some(100.0), Some(180.0), Some(1100.0)),
        ];

        let (records, report) = build(&input)?;

        assert_eq!(records[0], SilverRecord::new(day(1), -10.0, 0.0, 0.0, 900.0));
        assert_eq!(records[1], SilverRecord::new(day(2), 60.0, 100.0, 180.0, 1100.0));
        assert!(report.columns.iter().all(|c| c.out_of_range == 0));
        Ok(())
    }

    #[test]
    fn test_out_of_order_input_is_sorted_and_filled() -> Result<()> {
        let input = vec![
            obs("2013-01-05", Some(18.0)),
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-03", Some(14.0)),
        ];

        let (records, _) = build(&input)?;

        assert_eq!(records.first().unwrap().date, day(1));
        assert_eq!(records.last().unwrap().date, day(5));
        assert_eq!(temps(&records), vec![10.0, 12.0, 14.0, 16.0, 18.0]);
        Ok(())
    }

    #[test]
    fn test_unparseable_dates_are_dropped() -> Result<()> {
        let input = vec![
            obs("2013-01-01", Some(10.0)),
            obs("yesterday", Some(40.0)),
            obs("", Some(40.0)),
            obs("2013-01-02", Some(11.0)),
        ];

        let (records, report) = build(&input)?;

        assert_eq!(temps(&records), vec![10.0, 11.0]);
        assert_eq!(report.unparseable_dates, 2);
        assert_eq!(report.input_rows, 4);
        Ok(())
    }

    #[test]
    fn test_non_finite_values_are_missing() -> Result<()> {
        let input = vec![
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-02", Some(f64::NAN)),
            obs("2013-01-03", Some(f64::INFINITY)),
            obs("2013-01-04", Some(16.0)),
        ];

        let (records, _) = build(&input)?;

        assert_eq!(temps(&records), vec![10.0, 12.0, 14.0, 16.0]);
        Ok(())
    }

    #[test]
    fn test_columns_are_filled_independently() -> Result<()> {
        let input = vec![
            RawObservation::new("2013-01-01", Some(10.0), None, Some(2.0), Some(1000.0)),
            RawObservation::new("2013-01-02", None, Some(50.0), None, Some(1002.0)),
            RawObservation::new("2013-01-03", Some(14.0), Some(70.0), Some(6.0), Some(5000.0)),
        ];

        let (records, _) = build(&input)?;

        assert_eq!(records[0], SilverRecord::new(day(1), 10.0, 50.0, 2.0, 1000.0));
        assert_eq!(records[1], SilverRecord::new(day(2), 12.0, 50.0, 4.0, 1002.0));
        assert_eq!(records[2], SilverRecord::new(day(3), 14.0, 70.0, 6.0, 1002.0));
        Ok(())
    }

    #[test]
    fn test_single_row() -> Result<()> {
        let (records, _) = build(&[obs("2013-01-01", Some(10.0))])?;

        assert_eq!(records, vec![SilverRecord::new(day(1), 10.0, 80.0, 5.0, 1015.0)]);
        Ok(())
    }

    #[test]
    fn test_single_out_of_range_row_is_unrecoverable() {
        let result = build(&[obs("2013-01-01", Some(999.0))]);

        assert!(matches!(
            result,
            Err(PipelineError::UnrecoverableGap { column: "meantemp" })
        ));
    }

    #[test]
    fn test_entirely_missing_column_is_unrecoverable() {
        let input = vec![
            RawObservation::new("2013-01-01", Some(10.0), Some(80.0), None, Some(1015.0)),
            RawObservation::new("2013-01-03", Some(12.0), Some(82.0), Some(-4.0), Some(1016.0)),
        ];

        let result = build(&input);

        assert!(matches!(
            result,
            Err(PipelineError::UnrecoverableGap { column: "wind_speed" })
        ));
    }

    #[test]
    fn test_no_parseable_dates_is_missing_data() {
        let result = build(&[obs("n/a", Some(10.0))]);
        assert!(matches!(result, Err(PipelineError::MissingData(_))));

        let result = build(&[]);
        assert!(matches!(result, Err(PipelineError::MissingData(_))));
    }

    #[test]
    fn test_build_is_deterministic() -> Result<()> {
        let input = vec![
            obs("2013-01-04", Some(13.0)),
            obs("2013-01-01", Some(10.0)),
            obs("2013-01-01", Some(11.0)),
            obs("2013-01-07", Some(200.0)),
            obs("2013-01-08", Some(9.0)),
        ];

        let (first, first_report) = build(&input)?;
        let (second, second_report) = build(&input)?;

        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
        Ok(())
    }

    #[test]
    fn test_interpolate_gaps_long_interior_gap() {
        let mut values = vec![Some(0.0), None, None, None, Some(8.0)];

        assert_eq!(interpolate_gaps(&mut values), Some(3));
        assert_eq!(values, vec![Some(0.0), Some(2.0), Some(4.0), Some(6.0), Some(8.0)]);
    }

    #[test]
    fn test_interpolate_gaps_all_missing() {
        let mut values: Vec<Option<f64>> = vec![None, None];
        assert_eq!(interpolate_gaps(&mut values), None);

        let mut empty: Vec<Option<f64>> = Vec::new();
        assert_eq!(interpolate_gaps(&mut empty), None);
    }
}
