//! Core data models for the crop yield advisor

use crate::error::AgroError;
use serde::{Deserialize, Serialize};

/// Number of model input features
pub const NUM_FEATURES: usize = 4;

/// CSV header, in file order
pub const CSV_HEADER: [&str; 5] = ["umidade", "ph", "irrigacao", "fertilizante", "produtividade"];

/// One row of the agricultural dataset
///
/// Field names on the wire follow the CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "umidade")]
    pub humidity: f64,
    #[serde(rename = "ph")]
    pub ph: f64,
    #[serde(rename = "irrigacao")]
    pub irrigation: f64,
    #[serde(rename = "fertilizante")]
    pub fertilizer: f64,
    #[serde(rename = "produtividade")]
    pub crop_yield: f64,
}

impl Sample {
    /// Model inputs of this row
    pub fn features(&self) -> Features {
        Features {
            humidity: self.humidity,
            ph: self.ph,
            irrigation: self.irrigation,
            fertilizer: self.fertilizer,
        }
    }

    /// Value of a single column
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Humidity => self.humidity,
            Column::Ph => self.ph,
            Column::Irrigation => self.irrigation,
            Column::Fertilizer => self.fertilizer,
            Column::Yield => self.crop_yield,
        }
    }

    pub fn is_finite(&self) -> bool {
        Column::ALL.iter().all(|c| self.value(*c).is_finite())
    }
}

/// The four model inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub humidity: f64,
    pub ph: f64,
    pub irrigation: f64,
    pub fertilizer: f64,
}

impl Features {
    /// Inputs in model column order
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [self.humidity, self.ph, self.irrigation, self.fertilizer]
    }
}

/// Numeric columns of the dataset, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Humidity,
    Ph,
    Irrigation,
    Fertilizer,
    Yield,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Humidity,
        Column::Ph,
        Column::Irrigation,
        Column::Fertilizer,
        Column::Yield,
    ];

    /// Name used in the CSV header
    pub fn csv_name(self) -> &'static str {
        match self {
            Column::Humidity => CSV_HEADER[0],
            Column::Ph => CSV_HEADER[1],
            Column::Irrigation => CSV_HEADER[2],
            Column::Fertilizer => CSV_HEADER[3],
            Column::Yield => CSV_HEADER[4],
        }
    }

    /// Human-readable label with units
    pub fn label(self) -> &'static str {
        match self {
            Column::Humidity => "Humidity (%)",
            Column::Ph => "pH",
            Column::Irrigation => "Irrigation (mm)",
            Column::Fertilizer => "Fertilizer (kg/ha)",
            Column::Yield => "Yield",
        }
    }
}

/// Bounds and default of one scenario input control
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl InputRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, value: f64) -> Result<f64, AgroError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(AgroError::InvalidScenarioInput {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const HUMIDITY_INPUT: InputRange = InputRange {
    field: "humidity",
    min: 10.0,
    max: 90.0,
    default: 50.0,
    step: 1.0,
};

pub const PH_INPUT: InputRange = InputRange {
    field: "ph",
    min: 4.0,
    max: 8.0,
    default: 6.0,
    step: 0.01,
};

pub const IRRIGATION_INPUT: InputRange = InputRange {
    field: "irrigation",
    min: 0.0,
    max: 50.0,
    default: 10.0,
    step: 1.0,
};

pub const FERTILIZER_INPUT: InputRange = InputRange {
    field: "fertilizer",
    min: 0.0,
    max: 300.0,
    default: 100.0,
    step: 1.0,
};

/// Input controls in display order
pub const SCENARIO_INPUTS: [InputRange; NUM_FEATURES] =
    [HUMIDITY_INPUT, PH_INPUT, IRRIGATION_INPUT, FERTILIZER_INPUT];

/// A single what-if input tuple, validated against the control bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scenario {
    features: Features,
}

impl Scenario {
    pub fn new(features: Features) -> Result<Self, AgroError> {
        HUMIDITY_INPUT.check(features.humidity)?;
        PH_INPUT.check(features.ph)?;
        IRRIGATION_INPUT.check(features.irrigation)?;
        FERTILIZER_INPUT.check(features.fertilizer)?;
        Ok(Self { features })
    }

    pub fn features(&self) -> &Features {
        &self.features
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            features: Features {
                humidity: HUMIDITY_INPUT.default,
                ph: PH_INPUT.default,
                irrigation: IRRIGATION_INPUT.default,
                fertilizer: FERTILIZER_INPUT.default,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_matches_control_defaults() {
        let scenario = Scenario::default();
        assert_eq!(scenario.features().to_array(), [50.0, 6.0, 10.0, 100.0]);
        assert!(Scenario::new(*scenario.features()).is_ok());
    }

    #[test]
    fn test_scenario_bounds_are_inclusive() {
        let edge = Features {
            humidity: 90.0,
            ph: 4.0,
            irrigation: 0.0,
            fertilizer: 300.0,
        };
        assert!(Scenario::new(edge).is_ok());
    }

    #[test]
    fn test_scenario_rejects_out_of_range() {
        let features = Features {
            humidity: 50.0,
            ph: 8.5,
            irrigation: 10.0,
            fertilizer: 100.0,
        };
        match Scenario::new(features) {
            Err(AgroError::InvalidScenarioInput { field, value, .. }) => {
                assert_eq!(field, "ph");
                assert_eq!(value, 8.5);
            }
            other => panic!("expected InvalidScenarioInput, got {:?}", other),
        }

        let nan = Features {
            humidity: f64::NAN,
            ..features
        };
        assert!(Scenario::new(nan).is_err());
    }

    #[test]
    fn test_column_names_follow_header() {
        let names: Vec<_> = Column::ALL.iter().map(|c| c.csv_name()).collect();
        assert_eq!(names, CSV_HEADER);
    }
}
