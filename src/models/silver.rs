use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Measure;

/// One day of the canonical silver series; every measurement is present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilverRecord {
    pub date: NaiveDate,
    pub meantemp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub meanpressure: f64,
}

impl SilverRecord {
    pub fn new(
        date: NaiveDate,
        meantemp: f64,
        humidity: f64,
        wind_speed: f64,
        meanpressure: f64,
    ) -> Self {
        Self {
            date,
            meantemp,
            humidity,
            wind_speed,
            meanpressure,
        }
    }

    pub fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::MeanTemp => self.meantemp,
            Measure::Humidity => self.humidity,
            Measure::WindSpeed => self.wind_speed,
            Measure::MeanPressure => self.meanpressure,
        }
    }
}
