use crate::models::{GoldFeatureSet, GoldRecord, Measure, SilverRecord};
use crate::utils::constants::{LAG_LONG, LAG_SHORT, ROLLING_WINDOW};

/// Leading rows without a full feature history
pub const GOLD_LEADING_ROWS: usize = if LAG_LONG > ROLLING_WINDOW - 1 {
    LAG_LONG
} else {
    ROLLING_WINDOW - 1
};

/// Shortest silver series that yields at least one gold row
pub const GOLD_MIN_SILVER_ROWS: usize = GOLD_LEADING_ROWS + 2;

pub struct GoldBuilder {
    feature_set: GoldFeatureSet,
}

impl GoldBuilder {
    pub fn new() -> Self {
        Self {
            feature_set: GoldFeatureSet::NextDayTemp,
        }
    }

    pub fn feature_set(&self) -> GoldFeatureSet {
        self.feature_set
    }

    /// Features from day N with the mean temperature of day N+1 as target.
    ///
    /// Input must be the date-sorted, contiguous silver series. Rows lacking
    /// a full history or a next day are dropped, so the output has
    /// `len - 8` rows for inputs longer than 8 days and is empty otherwise.
    pub fn build(&self, silver: &[SilverRecord]) -> Vec<GoldRecord> {
        match self.feature_set {
            GoldFeatureSet::NextDayTemp => build_next_day_temp(silver),
        }
    }
}

impl Default for GoldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_gold(silver: &[SilverRecord]) -> Vec<GoldRecord> {
    GoldBuilder::new().build(silver)
}

fn build_next_day_temp(silver: &[SilverRecord]) -> Vec<GoldRecord> {
    if silver.len() < GOLD_MIN_SILVER_ROWS {
        tracing::warn!(
            "Silver series of {} days is too short for gold features",
            silver.len()
        );
        return Vec::new();
    }

    let temp = column(silver, Measure::MeanTemp);
    let humidity = column(silver, Measure::Humidity);
    let pressure = column(silver, Measure::MeanPressure);

    (GOLD_LEADING_ROWS..silver.len() - 1)
        .map(|i| GoldRecord {
            date: silver[i].date,
            meantemp_today: temp[i],
            meantemp_lag_1: temp[i - LAG_SHORT],
            meantemp_lag_7: temp[i - LAG_LONG],
            meantemp_roll_7: trailing_mean(&temp, i),
            humidity_today: humidity[i],
            humidity_lag_1: humidity[i - LAG_SHORT],
            humidity_roll_7: trailing_mean(&humidity, i),
            meanpressure_today: pressure[i],
            meanpressure_lag_1: pressure[i - LAG_SHORT],
            meanpressure_roll_7: trailing_mean(&pressure, i),
            target: temp[i + 1],
        })
        .collect()
}

fn column(silver: &[SilverRecord], measure: Measure) -> Vec<f64> {
    silver.iter().map(|r| r.value(measure)).collect()
}

/// Mean of the window ending at `end`, inclusive
fn trailing_mean(values: &[f64], end: usize) -> f64 {
    let window = &values[end + 1 - ROLLING_WINDOW..=end];
    window.iter().sum::<f64>() / ROLLING_WINDOW as f64
}
