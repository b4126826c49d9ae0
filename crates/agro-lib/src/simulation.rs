//! What-if simulation: predict a yield and derive recommendations

use crate::advisor::{recommend, Advisory};
use crate::models::{Features, Scenario};
use crate::trainer::TrainedModel;
use serde::Serialize;

/// Outcome of one simulation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub scenario: Features,
    pub predicted_yield: f64,
    pub recommendations: Vec<Advisory>,
}

/// Run the fitted model on a scenario, then the rule engine on the result
pub fn simulate(trained: &TrainedModel, scenario: &Scenario) -> Simulation {
    let features = *scenario.features();
    let predicted_yield = trained.predict(&features);
    let recommendations = recommend(
        features.humidity,
        features.ph,
        features.irrigation,
        features.fertilizer,
        predicted_yield,
    );

    Simulation {
        scenario: features,
        predicted_yield,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::{LinearModel, RegressionMetrics};

    fn trained_with(model: LinearModel) -> TrainedModel {
        TrainedModel {
            model,
            metrics: RegressionMetrics {
                mae: 0.0,
                mse: 0.0,
                rmse: 0.0,
                r2: 1.0,
            },
            test_inputs: Vec::new(),
            test_actuals: Vec::new(),
            test_predictions: Vec::new(),
            train_rows: 0,
            test_rows: 0,
        }
    }

    #[test]
    fn test_simulation_uses_prediction_for_rules() {
        let trained = trained_with(LinearModel {
            weights: [0.0; 4],
            bias: 90.0,
        });
        let scenario = Scenario::new(Features {
            humidity: 80.0,
            ph: 4.0,
            irrigation: 10.0,
            fertilizer: 100.0,
        })
        .unwrap();

        let result = simulate(&trained, &scenario);
        assert_eq!(result.predicted_yield, 90.0);
        assert_eq!(
            result.recommendations,
            vec![
                Advisory::ReduceIrrigation,
                Advisory::ApplyLime,
                Advisory::MaintainManagement
            ]
        );
    }

    #[test]
    fn test_default_scenario_with_mid_yield_is_stable() {
        let trained = trained_with(LinearModel {
            weights: [0.1, 5.0, 0.2, 0.05],
            bias: 10.0,
        });
        // 5 + 30 + 2 + 5 + 10 = 52
        let result = simulate(&trained, &Scenario::default());
        assert!((result.predicted_yield - 52.0).abs() < 1e-12);
        assert_eq!(result.recommendations, vec![Advisory::StablePlan]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["recommendations"][0],
            "conditions stable, maintain current plan."
        );
        assert_eq!(json["scenario"]["humidity"], 50.0);
    }
}
