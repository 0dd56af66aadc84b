//! Unit tests for the end-to-end signal engine

use confluence::error::SignalError;
use confluence::models::regime::{Regime, TrendDirection};
use confluence::models::signal::Direction;
use confluence::models::strategy::StrategyKind;
use confluence::signals::{
    DeploymentProfile, EngineConfig, Rejection, ScoringConfig, SignalEngine,
};

use crate::test_utils::*;

#[test]
fn test_uptrend_produces_long_candidate() {
    let engine = SignalEngine::default();
    let evaluation = engine.evaluate("BTCUSDT", &uptrend_candles(250), None).unwrap();

    assert_eq!(evaluation.regime, Regime::Trending(TrendDirection::Up));
    assert_eq!(evaluation.selection.strategy, StrategyKind::Momentum);

    let candidate = evaluation.candidate().expect("candidate");
    assert_eq!(candidate.direction, Direction::Long);
    assert_eq!(candidate.symbol, "BTCUSDT");
    assert_eq!(candidate.score, 110.0);
    assert!(candidate.risk_reward >= 1.3);
    assert!(candidate.stop_loss < candidate.entry_price);
    assert!(candidate.take_profit > candidate.entry_price);
    assert!(candidate.targets.stop_pct <= 3.0 + 1e-9);
    assert!(candidate.reasons.iter().any(|r| r.starts_with("Favorable regime")));
}

#[test]
fn test_orderbook_pressure_adds_to_score() {
    let engine = SignalEngine::default();
    let evaluation = engine.evaluate("BTCUSDT", &uptrend_candles(250), Some(25.0)).unwrap();
    assert_eq!(evaluation.candidate().map(|c| c.score), Some(120.0));
}

#[test]
fn test_downtrend_produces_short_candidate() {
    let engine = SignalEngine::default();
    let evaluation = engine.evaluate("ETHUSDT", &downtrend_candles(250), None).unwrap();

    assert_eq!(evaluation.regime, Regime::Trending(TrendDirection::Down));
    let candidate = evaluation.candidate().expect("candidate");
    assert_eq!(candidate.direction, Direction::Short);
    assert!(candidate.stop_loss > candidate.entry_price);
    assert!(candidate.take_profit < candidate.entry_price);
}

#[test]
fn test_range_without_extremes_has_no_direction() {
    let engine = SignalEngine::default();
    let evaluation = engine.evaluate("SOLUSDT", &ranging_candles(250), None).unwrap();

    assert_eq!(evaluation.regime, Regime::Ranging);
    assert_eq!(evaluation.selection.strategy, StrategyKind::MeanReversion);
    assert_eq!(evaluation.rejection(), Some(&Rejection::NoDirection));
    assert!(evaluation.candidate().is_none());
}

#[test]
fn test_range_band_touch_is_rejected_for_score() {
    let engine = SignalEngine::default();
    let evaluation = engine.evaluate("SOLUSDT", &range_touch_candles(250, 98.5), None).unwrap();

    assert_eq!(evaluation.regime, Regime::Ranging);
    assert_eq!(evaluation.selection.strategy, StrategyKind::MeanReversion);
    assert!(evaluation.snapshot.close <= evaluation.snapshot.bb_lower);
    assert!(evaluation.snapshot.rsi > 25.0 && evaluation.snapshot.rsi < 75.0);
    assert_eq!(evaluation.selection.direction(), Some(Direction::Long));
    assert_eq!(
        evaluation.rejection(),
        Some(&Rejection::ScoreBelowMinimum {
            score: 25.0,
            min: 60.0
        })
    );
}

#[test]
fn test_short_history_is_an_error() {
    let engine = SignalEngine::default();
    let result = engine.evaluate("BTCUSDT", &uptrend_candles(150), None);

    assert!(matches!(
        result,
        Err(SignalError::InsufficientData {
            required: 200,
            actual: 150
        })
    ));
}

#[test]
fn test_minimum_score_rejects() {
    let config = EngineConfig {
        scoring: ScoringConfig {
            min_score: 150.0,
            ..ScoringConfig::for_profile(DeploymentProfile::Conservative)
        },
        ..EngineConfig::default()
    };
    let evaluation = SignalEngine::new(config)
        .evaluate("BTCUSDT", &uptrend_candles(250), None)
        .unwrap();

    assert_eq!(
        evaluation.rejection(),
        Some(&Rejection::ScoreBelowMinimum {
            score: 110.0,
            min: 150.0
        })
    );
}

#[test]
fn test_retarget_flips_bracket() {
    let engine = SignalEngine::default();
    let evaluation = engine.evaluate("BTCUSDT", &uptrend_candles(250), None).unwrap();
    let candidate = evaluation.candidate().unwrap();

    let same = engine.retarget(candidate, Direction::Long, &evaluation.structure);
    assert_eq!(&same, candidate);

    let flipped = engine.retarget(candidate, Direction::Short, &evaluation.structure);
    assert_eq!(flipped.direction, Direction::Short);
    assert_eq!(flipped.entry_price, candidate.entry_price);
    assert_eq!(flipped.score, candidate.score);
    assert!(flipped.stop_loss > flipped.entry_price);
    assert!(flipped.take_profit < flipped.entry_price);
    assert_eq!(flipped.reasons.len(), candidate.reasons.len() + 1);
    assert_eq!(
        flipped.reasons.last().map(String::as_str),
        Some("Direction overridden by decision agent (LONG -> SHORT)")
    );
}
