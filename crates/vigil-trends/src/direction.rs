use vigil_core::models::TrendDirection;

/// Compare the mean of the latest third against the earliest third.
///
/// Group size is `max(1, n / 3)`. A difference larger than `noise_margin`
/// in either direction counts as a trend. Callers handle `n < 2`.
pub fn direction_by_thirds(values: &[f64], noise_margin: f64) -> TrendDirection {
    let group = (values.len() / 3).max(1);
    if values.len() < 2 {
        return TrendDirection::Stable;
    }
    let early = mean(&values[..group]);
    let late = mean(&values[values.len() - group..]);
    if late - early > noise_margin {
        TrendDirection::Increasing
    } else if early - late > noise_margin {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
