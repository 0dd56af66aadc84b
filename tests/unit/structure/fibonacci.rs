//! Unit tests for Fibonacci retracements

use confluence::models::indicators::Candle;
use confluence::models::structure::{FibProximity, FibTrend};
use confluence::structure::fibonacci::calculate_levels;
use confluence::structure::{analyze_fibonacci, FibonacciConfig};

use crate::test_utils::*;

/// Ten candles stepping up by 2, lows 90..=108 and highs 92..=110
fn rising_swing() -> Vec<Candle> {
    (0..10)
        .map(|i| {
            let low = 90.0 + 2.0 * i as f64;
            Candle::new(time_at(i), low + 1.0, low + 2.0, low, low + 1.0, 1000.0)
        })
        .collect()
}

fn config() -> FibonacciConfig {
    FibonacciConfig {
        lookback: 10,
        ..FibonacciConfig::default()
    }
}

#[test]
fn test_levels_for_up_swing() {
    let levels = calculate_levels(&rising_swing(), 10).unwrap();

    assert_eq!(levels.trend, FibTrend::Up);
    assert_eq!(levels.swing_high, 110.0);
    assert_eq!(levels.swing_low, 90.0);
    assert!((levels.level_500 - 100.0).abs() < 1e-9);
    assert!((levels.level_382 - 102.36).abs() < 1e-9);
    assert!((levels.level_618 - 97.64).abs() < 1e-9);
    assert!(levels.level_236 > levels.level_382);
    assert!(levels.level_786 < levels.level_618);
}

#[test]
fn test_levels_for_down_swing() {
    let mut candles = rising_swing();
    candles.reverse();
    let levels = calculate_levels(&candles, 10).unwrap();

    assert_eq!(levels.trend, FibTrend::Down);
    assert!((levels.level_382 - 97.64).abs() < 1e-9);
}

#[test]
fn test_proximity_bands() {
    let candles = rising_swing();

    let spot_on = analyze_fibonacci(&candles, 100.1, &config()).unwrap().unwrap();
    assert_eq!(spot_on.nearest_ratio, 0.5);
    assert_eq!(spot_on.proximity, FibProximity::SpotOn);

    let near = analyze_fibonacci(&candles, 102.0, &config()).unwrap().unwrap();
    assert_eq!(near.nearest_ratio, 0.382);
    assert_eq!(near.proximity, FibProximity::Near);

    let far = analyze_fibonacci(&candles, 106.0, &config()).unwrap().unwrap();
    assert_eq!(far.proximity, FibProximity::Far);
    assert!(far.distance_pct > 0.5);
}

#[test]
fn test_short_window_has_no_levels() {
    let candles = rising_swing();
    assert!(calculate_levels(&candles[..9], 10).is_none());
    assert!(analyze_fibonacci(&candles[..9], 100.0, &config()).unwrap().is_none());
}

#[test]
fn test_zero_range_has_no_levels() {
    let candles = doji_candles(&[100.0; 10]);
    // Highs and lows are constant, so the range is the wick width only
    assert!(calculate_levels(&candles, 10).is_some());
    let flat: Vec<Candle> = (0..10)
        .map(|i| Candle::new(time_at(i), 100.0, 100.0, 100.0, 100.0, 1.0))
        .collect();
    assert!(calculate_levels(&flat, 10).is_none());
}
