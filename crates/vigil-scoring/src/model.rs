use std::collections::BTreeMap;

use vigil_core::traits::IScoreModel;

use crate::weights::WeightTable;

/// Default signal model: weighted mean of the (already 0–1) features.
#[derive(Debug, Clone, Default)]
pub struct WeightedMeanModel {
    weights: WeightTable,
}

impl WeightedMeanModel {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }
}

impl IScoreModel for WeightedMeanModel {
    fn probability(&self, features: &BTreeMap<String, f64>) -> f64 {
        let (sum, total) = features.iter().fold((0.0, 0.0), |(sum, total), (key, value)| {
            let w = self.weights.weight(key);
            (sum + w * value, total + w)
        });
        if total > 0.0 {
            (sum / total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn name(&self) -> &'static str {
        "weighted_mean"
    }
}
