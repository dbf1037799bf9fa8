use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named gold feature tables; the name selects the artifact file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoldFeatureSet {
    /// Features from day N, target is the mean temperature of day N+1
    NextDayTemp,
}

impl GoldFeatureSet {
    pub fn name(&self) -> &'static str {
        match self {
            GoldFeatureSet::NextDayTemp => "next_day_temp",
        }
    }
}

impl std::fmt::Display for GoldFeatureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One row of the next-day-temperature feature table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldRecord {
    pub date: NaiveDate,

    pub meantemp_today: f64,
    pub meantemp_lag_1: f64,
    pub meantemp_lag_7: f64,
    pub meantemp_roll_7: f64,

    pub humidity_today: f64,
    pub humidity_lag_1: f64,
    pub humidity_roll_7: f64,

    pub meanpressure_today: f64,
    pub meanpressure_lag_1: f64,
    pub meanpressure_roll_7: f64,

    /// Mean temperature of the following day
    pub target: f64,
}
