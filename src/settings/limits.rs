use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Measure;

/// Inclusive physical bounds for one measurement column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Physical bounds applied by the silver build and by silver/gold validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bound_order"))]
#[serde(default)]
pub struct DataLimits {
    // Slightly wider than the all-time extremes of the source station
    pub temp_min: f64,
    pub temp_max: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_min: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_max: f64,

    // Daily means never approach cyclone gust speeds
    #[validate(range(min = 0.0))]
    pub wind_speed_min: f64,
    pub wind_speed_max: f64,

    // Cut-off chosen to reject obvious sensor outliers
    pub pressure_min: f64,
    pub pressure_max: f64,
}

impl DataLimits {
    pub fn bounds(&self, measure: Measure) -> Bounds {
        let (min, max) = match measure {
            Measure::MeanTemp => (self.temp_min, self.temp_max),
            Measure::Humidity => (self.humidity_min, self.humidity_max),
            Measure::WindSpeed => (self.wind_speed_min, self.wind_speed_max),
            Measure::MeanPressure => (self.pressure_min, self.pressure_max),
        };
        Bounds { min, max }
    }
}

impl Default for DataLimits {
    fn default() -> Self {
        Self {
            temp_min: -10.0,
            temp_max: 60.0,
            humidity_min: 0.0,
            humidity_max: 100.0,
            wind_speed_min: 0.0,
            wind_speed_max: 180.0,
            pressure_min: 900.0,
            pressure_max: 1100.0,
        }
    }
}

fn validate_bound_order(limits: &DataLimits) -> Result<(), ValidationError> {
    for measure in Measure::ALL {
        let bounds = limits.bounds(measure);
        if !(bounds.min <= bounds.max) {
            let mut error = ValidationError::new("bound_order");
            error.message = Some(
                format!(
                    "{} bounds are inverted: min {} > max {}",
                    measure.column(),
                    bounds.min,
                    bounds.max
                )
                .into(),
            );
            return Err(error);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = DataLimits::default();
        assert!(limits.validate().is_ok());

        let temp = limits.bounds(Measure::MeanTemp);
        assert_eq!(temp, Bounds { min: -10.0, max: 60.0 });
        assert!(temp.contains(-10.0));
        assert!(temp.contains(60.0));
        assert!(!temp.contains(60.1));
        assert!(!temp.contains(f64::NAN));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let limits = DataLimits {
            pressure_min: 1100.0,
            pressure_max: 900.0,
            ..DataLimits::default()
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_humidity_outside_percentage_rejected() {
        let limits = DataLimits {
            humidity_max: 120.0,
            ..DataLimits::default()
        };
        assert!(limits.validate().is_err());
    }
}
