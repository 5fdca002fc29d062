use std::collections::BTreeMap;

/// Turns raw features (each 0.0–1.0) into a risk probability.
pub trait IScoreModel: Send + Sync {
    fn probability(&self, features: &BTreeMap<String, f64>) -> f64;

    fn name(&self) -> &'static str;
}
