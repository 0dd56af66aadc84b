//! Unit tests for RSI divergence detection

use confluence::models::indicators::Candle;
use confluence::models::structure::DivergenceDirection;
use confluence::structure::{detect_divergences, DivergenceConfig};

use crate::test_utils::*;

fn with_base(tail: &[f64]) -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..26).map(|i| 100.0 + (i % 2) as f64).collect();
    closes.extend_from_slice(tail);
    doji_candles(&closes)
}

#[test]
fn test_bullish_divergence() {
    // Second low undercuts the first after a slow grind, so RSI sits higher
    let candles = with_base(&[
        97.0, 94.0, 91.0, 88.0, 90.0, 93.0, 96.0, 98.0, 97.0, 96.0, 95.0, 94.0, 93.0, 92.0,
        91.0, 90.0, 87.5, 91.0, 92.0,
    ]);
    let divergences = detect_divergences(&candles, &DivergenceConfig::default()).unwrap();

    assert_eq!(divergences.len(), 1);
    let divergence = &divergences[0];
    assert_eq!(divergence.direction, DivergenceDirection::Bullish);
    assert!(divergence.strength > 0.0);
    let [earlier, recent] = divergence.pivot_indices;
    assert!(earlier < recent);
    assert_eq!(candles[recent].close, 87.5);
}

#[test]
fn test_bearish_divergence() {
    let candles = with_base(&[
        104.0, 107.0, 110.0, 113.0, 111.0, 108.0, 105.0, 103.0, 104.0, 105.0, 106.0, 107.0,
        108.0, 109.0, 110.0, 111.0, 113.5, 112.0, 111.0,
    ]);
    let divergences = detect_divergences(&candles, &DivergenceConfig::default()).unwrap();

    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].direction, DivergenceDirection::Bearish);
    assert!(divergences[0].strength > 0.0);
}

#[test]
fn test_too_few_candles() {
    let candles = doji_candles(&[100.0, 99.0, 101.0, 98.0, 102.0]);
    assert!(detect_divergences(&candles, &DivergenceConfig::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_flat_series_has_no_pivots() {
    let candles = flat_candles(60, 100.0);
    assert!(detect_divergences(&candles, &DivergenceConfig::default())
        .unwrap()
        .is_empty());
}
