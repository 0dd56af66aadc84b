//! Unit tests for RSI, MACD and Stochastic RSI

use crate::test_utils::*;
use confluence::indicators::momentum::{calculate_macd, calculate_rsi, calculate_stoch_rsi, rsi_values};

#[test]
fn test_rsi_saturates_without_losses() {
    let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let rsi = rsi_values(&values, 14);
    assert_eq!(rsi.len(), 6);
    assert!(rsi.iter().all(|v| *v == 100.0));
}

#[test]
fn test_rsi_zero_without_gains() {
    let values: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
    assert!(rsi_values(&values, 14).iter().all(|v| *v == 0.0));
}

#[test]
fn test_rsi_flat_window_is_neutral() {
    let values = vec![100.0; 20];
    assert!(rsi_values(&values, 14).iter().all(|v| *v == 50.0));
}

#[test]
fn test_rsi_balanced_moves() {
    let values: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
    assert_eq!(rsi_values(&values, 14), vec![50.0]);
}

#[test]
fn test_calculate_rsi_warmup() {
    let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
    assert!(calculate_rsi(&create_test_candles(&closes[..14]), 14).is_none());

    let rsi = calculate_rsi(&create_test_candles(&closes), 14).unwrap();
    assert_eq!(rsi.len(), 1);
    assert_eq!(rsi.warmup(), 14);
}

#[test]
fn test_macd_insufficient_data() {
    assert!(calculate_macd(&flat_candles(33, 100.0), 12, 26, 9).is_none());
    assert!(calculate_macd(&flat_candles(100, 100.0), 26, 12, 9).is_none());

    let macd = calculate_macd(&flat_candles(34, 100.0), 12, 26, 9).unwrap();
    assert_eq!(macd.histogram.len(), 1);
    assert_eq!(macd.macd.len(), 9);
}

#[test]
fn test_macd_flat_series_is_zero() {
    let macd = calculate_macd(&flat_candles(60, 100.0), 12, 26, 9).unwrap();
    assert_eq!(macd.macd.latest(), Some(0.0));
    assert_eq!(macd.signal.latest(), Some(0.0));
    assert_eq!(macd.histogram.latest(), Some(0.0));
}

#[test]
fn test_macd_positive_in_uptrend() {
    let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64 * 0.5).collect();
    let macd = calculate_macd(&create_test_candles(&closes), 12, 26, 9).unwrap();
    assert!(macd.macd.latest().unwrap() > 0.0);
}

#[test]
fn test_stoch_rsi_flat_reads_midpoint() {
    let stoch = calculate_stoch_rsi(&flat_candles(60, 100.0), 14, 14, 3, 3).unwrap();
    assert_eq!(stoch.k.latest(), Some(50.0));
    assert_eq!(stoch.d.latest(), Some(50.0));
}

#[test]
fn test_stoch_rsi_insufficient_data() {
    assert!(calculate_stoch_rsi(&flat_candles(20, 100.0), 14, 14, 3, 3).is_none());
}
