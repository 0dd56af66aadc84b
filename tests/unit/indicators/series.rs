//! Unit tests for offset-aligned indicator series

use confluence::indicators::AlignedSeries;

#[test]
fn test_trailing_series_aligns_with_last_candle() {
    let series = AlignedSeries::trailing(vec![1.0, 2.0, 3.0], 5);

    assert_eq!(series.warmup(), 2);
    assert_eq!(series.len(), 3);
    assert_eq!(series.at(0), None);
    assert_eq!(series.at(1), None);
    assert_eq!(series.at(2), Some(1.0));
    assert_eq!(series.at(4), Some(3.0));
    assert_eq!(series.at(5), None);
}

#[test]
fn test_offsets_from_latest() {
    let series = AlignedSeries::trailing(vec![1.0, 2.0, 3.0], 5);

    assert_eq!(series.latest(), Some(3.0));
    assert_eq!(series.previous(), Some(2.0));
    assert_eq!(series.back(2), Some(1.0));
    assert_eq!(series.back(3), None);
}

#[test]
fn test_longer_values_are_truncated_to_source() {
    let series = AlignedSeries::trailing(vec![1.0, 2.0, 3.0, 4.0], 2);
    assert_eq!(series.values(), &[3.0, 4.0]);
    assert_eq!(series.warmup(), 0);
}

#[test]
fn test_empty_series() {
    let series = AlignedSeries::trailing(Vec::new(), 10);
    assert!(series.is_empty());
    assert_eq!(series.latest(), None);
    assert_eq!(series.previous(), None);
}
