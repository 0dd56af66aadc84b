//! Unit tests for candidate scoring and the threshold filter

use confluence::models::regime::{Regime, TrendDirection};
use confluence::models::signal::Direction;
use confluence::models::structure::{
    BlockKind, Divergence, DivergenceDirection, FibProximity, FibTrend, FibonacciAnalysis,
    FibonacciLevels, OrderBlock, StructureReport,
};
use confluence::signals::scoring::{check_thresholds, score_candidate};
use confluence::signals::{DeploymentProfile, Rejection, ScoringConfig};

fn strong_block(strength: f64) -> OrderBlock {
    OrderBlock {
        kind: BlockKind::Bullish,
        index: 3,
        top: 99.0,
        bottom: 98.0,
        high: 99.2,
        low: 97.8,
        move_size: 3.0,
        test_count: 0,
        tested: false,
        strength,
        valid: true,
    }
}

fn fibonacci(trend: FibTrend, proximity: FibProximity) -> FibonacciAnalysis {
    FibonacciAnalysis {
        levels: FibonacciLevels {
            trend,
            swing_high: 110.0,
            swing_low: 90.0,
            level_236: 105.28,
            level_382: 102.36,
            level_500: 100.0,
            level_618: 97.64,
            level_786: 94.28,
        },
        nearest_ratio: 0.5,
        nearest_price: 100.0,
        distance_pct: 0.1,
        proximity,
    }
}

#[test]
fn test_base_score_without_bonuses() {
    let breakdown = score_candidate(
        Direction::Long,
        55.0,
        &Regime::Neutral,
        &StructureReport::default(),
        None,
        &ScoringConfig::default(),
    );

    assert_eq!(breakdown.total(), 55.0);
    assert_eq!(breakdown.reasons().count(), 0);
}

#[test]
fn test_regime_bonus_only_when_aligned() {
    let config = ScoringConfig::default();
    let structure = StructureReport::default();
    let up = Regime::Trending(TrendDirection::Up);

    let long = score_candidate(Direction::Long, 50.0, &up, &structure, None, &config);
    assert_eq!(long.total(), 60.0);
    assert!(long.reasons().any(|r| r.contains("TRENDING_UP")));

    let short = score_candidate(Direction::Short, 50.0, &up, &structure, None, &config);
    assert_eq!(short.total(), 50.0);

    let breakout = Regime::Breakout(TrendDirection::Up);
    let long = score_candidate(Direction::Long, 50.0, &breakout, &structure, None, &config);
    assert_eq!(long.total(), 50.0);
}

#[test]
fn test_orderbook_bonus() {
    let config = ScoringConfig::default();
    let structure = StructureReport::default();
    let score = |direction, imbalance| {
        score_candidate(direction, 50.0, &Regime::Neutral, &structure, imbalance, &config).total()
    };

    assert_eq!(score(Direction::Long, Some(15.0)), 60.0);
    assert_eq!(score(Direction::Long, Some(5.0)), 50.0);
    assert_eq!(score(Direction::Long, Some(-15.0)), 50.0);
    assert_eq!(score(Direction::Short, Some(-15.0)), 60.0);
    assert_eq!(score(Direction::Short, None), 50.0);
}

#[test]
fn test_structure_bonuses_need_strength() {
    let config = ScoringConfig::default();
    let mut structure = StructureReport::default();

    structure.order_blocks.nearest = Some(strong_block(50.0));
    let weak = score_candidate(Direction::Long, 50.0, &Regime::Neutral, &structure, None, &config);
    assert_eq!(weak.total(), 50.0);

    structure.order_blocks.nearest = Some(strong_block(60.0));
    let strong = score_candidate(Direction::Long, 50.0, &Regime::Neutral, &structure, None, &config);
    assert_eq!(strong.total(), 65.0);
    assert!(strong.reasons().any(|r| r.starts_with("Strong order block")));
}

#[test]
fn test_fibonacci_bonus_follows_trend_and_proximity() {
    let config = ScoringConfig::default();
    let mut structure = StructureReport::default();
    let score = |structure: &StructureReport, direction| {
        score_candidate(direction, 50.0, &Regime::Neutral, structure, None, &config).total()
    };

    structure.fibonacci = Some(fibonacci(FibTrend::Up, FibProximity::SpotOn));
    assert_eq!(score(&structure, Direction::Long), 60.0);
    assert_eq!(score(&structure, Direction::Short), 50.0);

    structure.fibonacci = Some(fibonacci(FibTrend::Up, FibProximity::Far));
    assert_eq!(score(&structure, Direction::Long), 50.0);

    structure.fibonacci = Some(fibonacci(FibTrend::Down, FibProximity::Near));
    assert_eq!(score(&structure, Direction::Short), 60.0);
}

#[test]
fn test_divergence_bonus_matches_direction() {
    let config = ScoringConfig::default();
    let mut structure = StructureReport::default();
    structure.divergences.push(Divergence {
        direction: DivergenceDirection::Bullish,
        strength: 6.5,
        pivot_indices: [10, 20],
    });

    let long = score_candidate(Direction::Long, 50.0, &Regime::Neutral, &structure, None, &config);
    assert_eq!(long.total(), 60.0);
    assert!(long.reasons().any(|r| r == "RSI divergence (6.5)"));

    let short = score_candidate(Direction::Short, 50.0, &Regime::Neutral, &structure, None, &config);
    assert_eq!(short.total(), 50.0);
}

#[test]
fn test_score_is_not_capped() {
    let config = ScoringConfig::default();
    let mut structure = StructureReport::default();
    structure.order_blocks.nearest = Some(strong_block(80.0));
    let breakdown = score_candidate(
        Direction::Long,
        100.0,
        &Regime::Trending(TrendDirection::Up),
        &structure,
        Some(20.0),
        &config,
    );

    assert_eq!(breakdown.total(), 135.0);
    assert_eq!(breakdown.bonuses.len(), 3);
}

#[test]
fn test_thresholds_check_score_first() {
    let config = ScoringConfig::default();

    assert_eq!(
        check_thresholds(50.0, 0.5, &config),
        Err(Rejection::ScoreBelowMinimum {
            score: 50.0,
            min: 60.0
        })
    );
    assert_eq!(
        check_thresholds(70.0, 1.0, &config),
        Err(Rejection::RiskRewardBelowMinimum {
            risk_reward: 1.0,
            min: 1.3
        })
    );
    assert_eq!(check_thresholds(60.0, 1.3, &config), Ok(()));
}

#[test]
fn test_conservative_profile() {
    assert_eq!(
        DeploymentProfile::parse(" Conservative "),
        Some(DeploymentProfile::Conservative)
    );
    assert_eq!(DeploymentProfile::parse("standard"), Some(DeploymentProfile::Standard));
    assert_eq!(DeploymentProfile::parse("aggressive"), None);

    let config = ScoringConfig::for_profile(DeploymentProfile::Conservative);
    assert_eq!(config.min_score, 75.0);
    assert_eq!(config.min_risk_reward, 1.5);
    assert!(check_thresholds(70.0, 2.0, &config).is_err());
    assert_eq!(ScoringConfig::default().min_score, 60.0);
}

#[test]
fn test_rejection_labels() {
    assert_eq!(Rejection::NoDirection.label(), "no_direction");
    let score = Rejection::ScoreBelowMinimum {
        score: 50.0,
        min: 60.0,
    };
    assert_eq!(score.label(), "score");
    assert_eq!(score.to_string(), "score too low: 50 < 60");

    let rr = Rejection::RiskRewardBelowMinimum {
        risk_reward: 1.0,
        min: 1.3,
    };
    assert_eq!(rr.label(), "risk_reward");
    assert_eq!(rr.to_string(), "risk:reward too low: 1:1.00 < 1:1.30");
}
