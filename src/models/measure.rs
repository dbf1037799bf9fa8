use serde::{Deserialize, Serialize};

use crate::utils::constants::{COL_HUMIDITY, COL_MEANPRESSURE, COL_MEANTEMP, COL_WIND_SPEED};

/// The four daily measurements carried through every tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    MeanTemp,
    Humidity,
    WindSpeed,
    MeanPressure,
}

impl Measure {
    /// Canonical column order
    pub const ALL: [Measure; 4] = [
        Measure::MeanTemp,
        Measure::Humidity,
        Measure::WindSpeed,
        Measure::MeanPressure,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Measure::MeanTemp => COL_MEANTEMP,
            Measure::Humidity => COL_HUMIDITY,
            Measure::WindSpeed => COL_WIND_SPEED,
            Measure::MeanPressure => COL_MEANPRESSURE,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Measure::MeanTemp => "Mean temperature",
            Measure::Humidity => "Humidity",
            Measure::WindSpeed => "Wind speed",
            Measure::MeanPressure => "Mean pressure",
        }
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
