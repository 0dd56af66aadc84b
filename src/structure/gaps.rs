//! Price imbalances
//!
//! Three-candle fair value gaps (first candle's range and third candle's range
//! do not overlap) and classic two-candle gaps. Fill is tracked against every
//! later candle; gaps at or beyond the fill limit are invalid.

use crate::error::AnalyzerError;
use crate::models::indicators::Candle;
use crate::models::structure::{Gap, GapKind, GapMap, GapPattern};
use crate::structure::{average_volume, days_between, ensure_analyzable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Minimum gap size in percent
    pub min_size_pct: f64,
    pub fill_invalidation: f64,
    pub fvg_bonus: f64,
    pub max_gaps_per_side: usize,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            min_size_pct: 0.2,
            fill_invalidation: 0.95,
            fvg_bonus: 5.0,
            max_gaps_per_side: 3,
        }
    }
}

/// Detect, score and filter gaps relative to `current_price`
pub fn detect_gaps(
    candles: &[Candle],
    current_price: f64,
    config: &GapConfig,
) -> Result<GapMap, AnalyzerError> {
    ensure_analyzable("gap", candles, current_price)?;
    if candles.len() < 3 {
        return Ok(GapMap::default());
    }

    let valid: Vec<Gap> = find_gaps(candles, config)
        .into_iter()
        .filter(|g| g.valid)
        .collect();

    let mut bullish: Vec<Gap> = valid
        .iter()
        .filter(|g| g.kind == GapKind::Bullish && g.bottom < current_price)
        .cloned()
        .collect();
    bullish.sort_by(|a, b| b.bottom.total_cmp(&a.bottom));
    bullish.truncate(config.max_gaps_per_side);

    let mut bearish: Vec<Gap> = valid
        .iter()
        .filter(|g| g.kind == GapKind::Bearish && g.top > current_price)
        .cloned()
        .collect();
    bearish.sort_by(|a, b| a.top.total_cmp(&b.top));
    bearish.truncate(config.max_gaps_per_side);

    let nearest = valid
        .iter()
        .min_by(|a, b| {
            (a.midpoint() - current_price)
                .abs()
                .total_cmp(&(b.midpoint() - current_price).abs())
        })
        .cloned();

    Ok(GapMap {
        bullish,
        bearish,
        nearest,
    })
}

/// All gaps with fill state and strength, strongest first
pub fn find_gaps(candles: &[Candle], config: &GapConfig) -> Vec<Gap> {
    let mut gaps = Vec::new();

    for i in 1..candles.len() {
        // Classic gap between adjacent candles
        let (prev, current) = (&candles[i - 1], &candles[i]);
        push_gap(
            &mut gaps,
            GapPattern::Classic,
            i,
            (prev.low, prev.high),
            (current.low, current.high),
            config,
        );

        if i >= 2 {
            let first = &candles[i - 2];
            push_gap(
                &mut gaps,
                GapPattern::FairValueGap,
                i,
                (first.low, first.high),
                (current.low, current.high),
                config,
            );
        }
    }

    let avg_volume = average_volume(candles);
    let reference_time = candles[candles.len() - 1].timestamp;

    for gap in &mut gaps {
        gap.filled = max_fill(gap, &candles[gap.index + 1..]);
        if gap.filled >= config.fill_invalidation {
            gap.valid = false;
        }

        // Volume of the impulse candle: the middle one for FVGs
        let impulse = match gap.pattern {
            GapPattern::FairValueGap => &candles[gap.index - 1],
            GapPattern::Classic => &candles[gap.index],
        };
        let days = days_between(candles[gap.index].timestamp, reference_time);
        gap.strength = score_gap(gap, impulse.volume, avg_volume, days, config);
    }

    gaps.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    gaps
}

/// Record a gap between an earlier and a later (low, high) range, if any
fn push_gap(
    gaps: &mut Vec<Gap>,
    pattern: GapPattern,
    index: usize,
    (earlier_low, earlier_high): (f64, f64),
    (later_low, later_high): (f64, f64),
    config: &GapConfig,
) {
    let (kind, top, bottom) = if earlier_high < later_low {
        (GapKind::Bullish, later_low, earlier_high)
    } else if earlier_low > later_high {
        (GapKind::Bearish, earlier_low, later_high)
    } else {
        return;
    };

    if bottom <= 0.0 {
        return;
    }
    let size = top - bottom;
    let size_percent = size / bottom * 100.0;
    if size_percent <= config.min_size_pct {
        return;
    }

    gaps.push(Gap {
        kind,
        pattern,
        index,
        top,
        bottom,
        size,
        size_percent,
        filled: 0.0,
        strength: 0.0,
        valid: true,
    });
}

/// Largest fraction of the gap retraced by any later candle
fn max_fill(gap: &Gap, later: &[Candle]) -> f64 {
    let mut max_fill: f64 = 0.0;
    for candle in later {
        let fill = match gap.kind {
            GapKind::Bullish if candle.low <= gap.bottom => 1.0,
            GapKind::Bullish if candle.low <= gap.top => (gap.top - candle.low) / gap.size,
            GapKind::Bearish if candle.high >= gap.top => 1.0,
            GapKind::Bearish if candle.high >= gap.bottom => (candle.high - gap.bottom) / gap.size,
            _ => 0.0,
        };
        max_fill = max_fill.max(fill);
        if max_fill >= 1.0 {
            break;
        }
    }
    max_fill.min(1.0)
}

fn score_gap(gap: &Gap, volume: f64, avg_volume: f64, days: f64, config: &GapConfig) -> f64 {
    if !gap.valid {
        return 0.0;
    }

    let mut score = if gap.size_percent > 2.0 {
        30.0
    } else if gap.size_percent > 1.0 {
        20.0
    } else if gap.size_percent > 0.5 {
        10.0
    } else {
        5.0
    };

    if volume > avg_volume * 2.0 {
        score += 20.0;
    } else if volume > avg_volume * 1.5 {
        score += 10.0;
    }

    if days < 1.0 {
        score += 20.0;
    } else if days < 3.0 {
        score += 15.0;
    } else if days < 7.0 {
        score += 10.0;
    } else if days > 30.0 {
        score -= 10.0;
    }

    score += if gap.filled == 0.0 {
        15.0
    } else if gap.filled < 0.5 {
        10.0
    } else {
        5.0
    };

    if gap.pattern == GapPattern::FairValueGap {
        score += config.fvg_bonus;
    }

    score
}
