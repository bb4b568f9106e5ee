//! Small statistics helpers shared by the engines.
//!
//! All functions are total: empty or too-short inputs produce a neutral value
//! (usually 0.0) instead of panicking.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Median with midpoint interpolation for even lengths.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Day-over-day fractional changes. Pairs that produce a non-finite value
/// (zero or missing previous close) are dropped.
pub fn pct_returns(data: &[f64]) -> Vec<f64> {
    data.windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect()
}

/// Mean of the trailing `window` values, or `None` when there are fewer.
pub fn trailing_mean(data: &[f64], window: usize) -> Option<f64> {
    if window == 0 || data.len() < window {
        return None;
    }
    Some(mean(&data[data.len() - window..]))
}

/// Sample standard deviation of the trailing `window` values.
pub fn trailing_std_dev(data: &[f64], window: usize) -> Option<f64> {
    if window < 2 || data.len() < window {
        return None;
    }
    Some(std_dev(&data[data.len() - window..]))
}

/// Round to a fixed number of decimal places for display.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
