use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Measure;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_DATETIME_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S%.f%:z"];

/// One raw daily observation as ingested.
///
/// The date stays as text until the silver build coerces it, so a bad date
/// only ever drops its own record. Measurement cells that could not be read
/// as numbers are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub meantemp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub meanpressure: Option<f64>,
}

impl RawObservation {
    pub fn new(
        date: impl Into<String>,
        meantemp: Option<f64>,
        humidity: Option<f64>,
        wind_speed: Option<f64>,
        meanpressure: Option<f64>,
    ) -> Self {
        Self {
            date: date.into(),
            meantemp,
            humidity,
            wind_speed,
            meanpressure,
        }
    }

    pub fn value(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::MeanTemp => self.meantemp,
            Measure::Humidity => self.humidity,
            Measure::WindSpeed => self.wind_speed,
            Measure::MeanPressure => self.meanpressure,
        }
    }

    pub fn calendar_day(&self) -> Option<NaiveDate> {
        parse_calendar_day(&self.date)
    }
}

/// Coerce a date or timestamp text to its calendar day; time of day is discarded.
pub fn parse_calendar_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .or_else(|| {
                    OFFSET_DATETIME_FORMATS
                        .iter()
                        .find_map(|format| DateTime::parse_from_str(text, format).ok())
                })
                .map(|datetime| datetime.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_calendar_day_formats() {
        assert_eq!(parse_calendar_day("2013-01-01"), Some(day(2013, 1, 1)));
        assert_eq!(parse_calendar_day(" 2013/01/02 "), Some(day(2013, 1, 2)));
        assert_eq!(parse_calendar_day("20130103"), Some(day(2013, 1, 3)));
        assert_eq!(parse_calendar_day("2013-01-04 18:30:00"), Some(day(2013, 1, 4)));
        assert_eq!(parse_calendar_day("2013-01-05T00:00:00"), Some(day(2013, 1, 5)));
        assert_eq!(
            parse_calendar_day("2013-01-06T10:00:00+05:30"),
            Some(day(2013, 1, 6))
        );
    }

    #[test]
    fn test_parse_calendar_day_month_first_slashes() {
        assert_eq!(parse_calendar_day("01/02/2013"), Some(day(2013, 1, 2)));
        assert_eq!(parse_calendar_day("12/31/2013"), Some(day(2013, 12, 31)));
        assert_eq!(parse_calendar_day("31/12/2013"), None);
    }

    #[test]
    fn test_parse_calendar_day_space_separated_offset() {
        assert_eq!(
            parse_calendar_day("2013-01-02 00:00:00+00:00"),
            Some(day(2013, 1, 2))
        );
        assert_eq!(
            parse_calendar_day("2013-01-03 23:15:00.250-04:00"),
            Some(day(2013, 1, 3))
        );
    }

    #[test]
    fn test_parse_calendar_day_rejects_garbage() {
        assert_eq!(parse_calendar_day(""), None);
        assert_eq!(parse_calendar_day("not a date"), None);
        assert_eq!(parse_calendar_day("2013-02-30"), None);
        assert_eq!(parse_calendar_day("2013-13-01"), None);
    }

    #[test]
    fn test_observation_values() {
        let observation = RawObservation::new("2013-01-01", Some(10.0), Some(84.5), None, Some(1015.6));

        assert_eq!(observation.value(Measure::MeanTemp), Some(10.0));
        assert_eq!(observation.value(Measure::WindSpeed), None);
        assert_eq!(observation.calendar_day(), Some(day(2013, 1, 1)));
    }
}
