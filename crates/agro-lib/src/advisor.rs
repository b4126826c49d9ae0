//! Rule-based agronomic recommendations
//!
//! Three independent categories are checked in a fixed order (humidity,
//! pH, predicted yield). Within a category the first matching branch wins.
//! When no category fires a single "stable" advisory is returned.

use serde::{Serialize, Serializer};
use std::fmt;

/// Humidity below this calls for more irrigation
pub const HUMIDITY_LOW: f64 = 40.0;
/// Humidity above this calls for less irrigation
pub const HUMIDITY_HIGH: f64 = 70.0;
/// Soil pH below this calls for liming
pub const PH_LOW: f64 = 5.5;
/// Soil pH above this calls for gypsum
pub const PH_HIGH: f64 = 7.0;
/// Predicted yield below this calls for more fertilization
pub const YIELD_LOW: f64 = 50.0;
/// Predicted yield above this means the current management works
pub const YIELD_HIGH: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    Humidity,
    Ph,
    Yield,
    Stable,
}

/// A single recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    IncreaseIrrigation,
    ReduceIrrigation,
    ApplyLime,
    ApplyGypsum,
    ReinforceFertilization,
    MaintainManagement,
    StablePlan,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Advisory::IncreaseIrrigation => "increase irrigation 20–30%",
            Advisory::ReduceIrrigation => "reduce irrigation",
            Advisory::ApplyLime => "apply lime",
            Advisory::ApplyGypsum => "apply agricultural gypsum",
            Advisory::ReinforceFertilization => "reinforce fertilization",
            Advisory::MaintainManagement => "maintain current management",
            Advisory::StablePlan => "conditions stable, maintain current plan.",
        }
    }

    pub fn category(self) -> AdvisoryCategory {
        match self {
            Advisory::IncreaseIrrigation | Advisory::ReduceIrrigation => AdvisoryCategory::Humidity,
            Advisory::ApplyLime | Advisory::ApplyGypsum => AdvisoryCategory::Ph,
            Advisory::ReinforceFertilization | Advisory::MaintainManagement => {
                AdvisoryCategory::Yield
            }
            Advisory::StablePlan => AdvisoryCategory::Stable,
        }
    }

    /// Short condition that triggered the advisory
    pub fn reason(self) -> &'static str {
        match self {
            Advisory::IncreaseIrrigation => "Low humidity",
            Advisory::ReduceIrrigation => "High humidity",
            Advisory::ApplyLime => "Low pH",
            Advisory::ApplyGypsum => "High pH",
            Advisory::ReinforceFertilization => "Low yield",
            Advisory::MaintainManagement => "High yield",
            Advisory::StablePlan => "Stable conditions",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Advisory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Recommendations for one scenario and its predicted yield
///
/// `irrigation` and `fertilizer` are part of the scenario but no rule
/// currently depends on them.
pub fn recommend(
    humidity: f64,
    ph: f64,
    _irrigation: f64,
    _fertilizer: f64,
    predicted_yield: f64,
) -> Vec<Advisory> {
    let mut advisories = Vec::with_capacity(3);

    if humidity < HUMIDITY_LOW {
        advisories.push(Advisory::IncreaseIrrigation);
    } else if humidity > HUMIDITY_HIGH {
        advisories.push(Advisory::ReduceIrrigation);
    }

    if ph < PH_LOW {
        advisories.push(Advisory::ApplyLime);
    } else if ph > PH_HIGH {
        advisories.push(Advisory::ApplyGypsum);
    }

    if predicted_yield < YIELD_LOW {
        advisories.push(Advisory::ReinforceFertilization);
    } else if predicted_yield > YIELD_HIGH {
        advisories.push(Advisory::MaintainManagement);
    }

    if advisories.is_empty() {
        advisories.push(Advisory::StablePlan);
    }

    advisories
}
