use crate::models::DecayInput;

/// Pluggable decay probability function.
///
/// Implementations must return a value in [0.0, 1.0] that increases with
/// `days_since_access` and does not increase with strength, emotional weight,
/// or importance. The increase is strict until the result rounds to 1.0 in
/// `f64`; past that point it stays at 1.0.
pub trait IDecayStrategy: Send + Sync {
    fn probability(&self, input: &DecayInput) -> f64;

    /// Short identifier recorded on every prediction.
    fn name(&self) -> &'static str;
}
