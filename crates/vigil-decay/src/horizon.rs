use vigil_core::models::{CriticalHorizon, DecayInput};
use vigil_core::traits::IDecayStrategy;

/// Smallest whole number of days `d` in `0..=horizon_days` such that
/// `p(days_since_access + d) >= target`.
///
/// Binary search over the day offset; relies on the strategy being monotone
/// in days since access.
pub fn days_until(
    strategy: &dyn IDecayStrategy,
    input: &DecayInput,
    target: f64,
    horizon_days: u32,
) -> CriticalHorizon {
    let reaches = |d: u32| strategy.probability(&input.aged_by(f64::from(d))) >= target;

    if !reaches(horizon_days) {
        return CriticalHorizon::Unbounded;
    }
    let (mut lo, mut hi) = (0u32, horizon_days);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if reaches(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    CriticalHorizon::Days(lo)
}
