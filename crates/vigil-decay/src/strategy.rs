use vigil_core::config::LogisticParams;
use vigil_core::models::DecayInput;
use vigil_core::traits::IDecayStrategy;

/// Logistic blend:
///
/// ```text
/// z = intercept + day_rate·days − (wₛ·strength + wₑ·emotional + wᵢ·importance)
/// p = 1 / (1 + e^(−z))
/// ```
///
/// Strictly increasing in `days` as long as `day_rate > 0`, up to the point
/// where `p` rounds to 1.0. That happens once `z` passes roughly 37; with the
/// default parameters and zero protective weights, after about 1,260 days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticBlend {
    params: LogisticParams,
}

impl LogisticBlend {
    pub fn new(params: LogisticParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }

    fn logit(&self, input: &DecayInput) -> f64 {
        let p = &self.params;
        p.intercept + p.day_rate * input.days_since_access
            - (p.strength_weight * input.recall_strength
                + p.emotional_weight * input.emotional_weight
                + p.importance_weight * input.importance)
    }
}

impl Default for LogisticBlend {
    fn default() -> Self {
        Self::new(LogisticParams::default())
    }
}

impl IDecayStrategy for LogisticBlend {
    fn probability(&self, input: &DecayInput) -> f64 {
        let z = self.logit(input);
        (1.0 / (1.0 + (-z).exp())).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "logistic_blend"
    }
}
