//! Unit tests for EMA and ADX

use crate::test_utils::*;
use confluence::indicators::trend::{calculate_adx, calculate_ema, calculate_emas};

fn rising_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + i as f64).collect()
}

#[test]
fn test_ema_flat_series() {
    let candles = flat_candles(30, 100.0);
    let ema = calculate_ema(&candles, 10).unwrap();

    assert_eq!(ema.latest(), Some(100.0));
    assert_eq!(ema.warmup(), 9);
    assert_eq!(ema.len(), 21);
}

#[test]
fn test_ema_insufficient_data() {
    let candles = flat_candles(9, 100.0);
    assert!(calculate_ema(&candles, 10).is_none());
    assert!(calculate_ema(&candles, 0).is_none());
}

#[test]
fn test_ema_shorter_period_leads_in_uptrend() {
    let candles = create_test_candles(&rising_closes(60));
    let fast = calculate_ema(&candles, 9).unwrap().latest().unwrap();
    let slow = calculate_ema(&candles, 21).unwrap().latest().unwrap();
    assert!(fast > slow);
}

#[test]
fn test_calculate_emas_skips_long_periods() {
    let candles = flat_candles(30, 100.0);
    let emas = calculate_emas(&candles, &[9, 50]);
    assert_eq!(emas.len(), 1);
    assert_eq!(emas[0].0, 9);
}

#[test]
fn test_adx_requires_two_periods() {
    let closes = rising_closes(28);
    assert!(calculate_adx(&create_test_candles(&closes[..27]), 14).is_none());
    assert!(calculate_adx(&create_test_candles(&closes), 14).is_some());
}

#[test]
fn test_adx_one_sided_trend() {
    let candles = create_test_candles(&rising_closes(40));
    let adx = calculate_adx(&candles, 14).unwrap();

    assert_eq!(adx.minus_di.latest(), Some(0.0));
    assert!(adx.plus_di.latest().unwrap() > 0.0);
    assert!((adx.adx.latest().unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn test_adx_flat_market_reads_zero() {
    let candles = flat_candles(40, 100.0);
    let adx = calculate_adx(&candles, 14).unwrap();
    assert_eq!(adx.adx.latest(), Some(0.0));
    assert_eq!(adx.plus_di.latest(), Some(0.0));
}
