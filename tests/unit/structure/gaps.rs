//! Unit tests for fair value gaps and classic gaps

use confluence::models::indicators::Candle;
use confluence::models::structure::{GapKind, GapPattern};
use confluence::structure::gaps::find_gaps;
use confluence::structure::{detect_gaps, GapConfig};

use crate::test_utils::*;

/// Candle 0 high 101 and candle 2 low 102.5 leave a bullish FVG
fn fvg_with_fourth_low(low: f64) -> Vec<Candle> {
    ohlc_candles(&[
        (100.0, 101.0, 99.0, 100.5),
        (100.5, 104.0, 100.4, 103.8),
        (103.8, 105.0, 102.5, 104.5),
        (104.5, 104.8, low, 104.2),
    ])
}

#[test]
fn test_bullish_fair_value_gap() {
    let candles = ohlc_candles(&[
        (100.0, 101.0, 99.0, 100.5),
        (100.5, 104.0, 100.4, 103.8),
        (103.8, 105.0, 102.5, 104.5),
    ]);
    let map = detect_gaps(&candles, 104.5, &GapConfig::default()).unwrap();

    assert_eq!(map.bullish.len(), 1);
    let gap = &map.bullish[0];
    assert_eq!(gap.kind, GapKind::Bullish);
    assert_eq!(gap.pattern, GapPattern::FairValueGap);
    assert_eq!(gap.top, 102.5);
    assert_eq!(gap.bottom, 101.0);
    assert_eq!(gap.filled, 0.0);
    assert!((gap.size_percent - 1.5 / 101.0 * 100.0).abs() < 1e-9);
    assert_eq!(map.count(), 1);
}

#[test]
fn test_partial_fill_keeps_gap_valid() {
    let candles = fvg_with_fourth_low(102.0);
    let map = detect_gaps(&candles, 104.2, &GapConfig::default()).unwrap();

    let gap = &map.bullish[0];
    assert!(gap.valid);
    assert!((gap.filled - 0.5 / 1.5).abs() < 1e-9);
}

#[test]
fn test_near_complete_fill_invalidates() {
    let candles = fvg_with_fourth_low(101.05);
    let gaps = find_gaps(&candles, &GapConfig::default());
    let gap = gaps.iter().find(|g| g.pattern == GapPattern::FairValueGap).unwrap();

    assert!(gap.filled >= 0.95);
    assert!(!gap.valid);
    assert_eq!(gap.strength, 0.0);
    assert!(detect_gaps(&candles, 104.2, &GapConfig::default()).unwrap().bullish.is_empty());
}

#[test]
fn test_classic_bearish_gap() {
    let candles = ohlc_candles(&[
        (105.0, 105.5, 104.5, 105.0),
        (102.0, 103.0, 101.5, 102.0),
        (102.0, 102.5, 101.5, 102.0),
    ]);
    let gaps = find_gaps(&candles, &GapConfig::default());
    let classic = gaps.iter().find(|g| g.pattern == GapPattern::Classic).unwrap();

    assert_eq!(classic.kind, GapKind::Bearish);
    assert_eq!(classic.top, 104.5);
    assert_eq!(classic.bottom, 103.0);
    assert_eq!(classic.index, 1);

    let map = detect_gaps(&candles, 102.0, &GapConfig::default()).unwrap();
    assert!(map.bearish.iter().all(|g| g.top > 102.0));
    assert!(!map.bearish.is_empty());
}

#[test]
fn test_tiny_gaps_are_ignored() {
    let candles = ohlc_candles(&[
        (100.0, 100.0, 99.5, 100.0),
        (100.1, 100.5, 100.1, 100.4),
        (100.4, 100.6, 100.15, 100.5),
    ]);
    assert!(find_gaps(&candles, &GapConfig::default()).is_empty());
}
