//! Numeric helpers shared by indicators and analyzers.
//!
//! Series helpers return only the values past the warm-up period, so the last
//! element always lines up with the last input.

/// Simple moving average of the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Rolling simple moving average
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    out.push(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out.push(sum / period as f64);
    }
    out
}

/// Exponential moving average seeded with the SMA of the first `period` values
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(current);
    for value in &values[period..] {
        current = (value - current) * k + current;
        out.push(current);
    }
    out
}

/// Latest EMA value
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied()
}

/// Wilder smoothing (RMA): SMA seed, then `(prev * (n - 1) + x) / n`
pub fn wilder_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let n = period as f64;
    let mut current = values[..period].iter().sum::<f64>() / n;
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(current);
    for value in &values[period..] {
        current = (current * (n - 1.0) + value) / n;
        out.push(current);
    }
    out
}

/// Population standard deviation of the last `period` values
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    let mean = sma(values, period)?;
    let window = &values[values.len() - period..];
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    Some(variance.sqrt())
}

pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Absolute distance between two prices as a percentage of `reference`
pub fn percent_distance(reference: f64, price: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (price - reference).abs() / reference * 100.0
}

/// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
