//! Structure-driven take-profit and stop-loss placement

use crate::models::signal::{Direction, StopSource, TargetPlan, TargetSource};
use crate::models::structure::StructureReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Targets closer than this (percent of entry) are ignored
    pub min_target_pct: f64,
    /// Targets further than this (percent of entry) are ignored
    pub max_target_pct: f64,
    pub atr_target_multiplier: f64,
    pub atr_stop_multiplier: f64,
    /// Distance placed beyond the invalidation level, percent of entry
    pub stop_buffer_pct: f64,
    pub min_stop_pct: f64,
    pub max_stop_pct: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            min_target_pct: 1.0,
            max_target_pct: 10.0,
            atr_target_multiplier: 3.0,
            atr_stop_multiplier: 1.5,
            stop_buffer_pct: 0.3,
            min_stop_pct: 0.5,
            max_stop_pct: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Level<S> {
    price: f64,
    strength: f64,
    source: S,
}

/// Signed distance from entry in the trade's favour, percent
fn favourable_pct(direction: Direction, entry: f64, price: f64) -> f64 {
    if entry <= 0.0 {
        return 0.0;
    }
    match direction {
        Direction::Long => (price - entry) / entry * 100.0,
        Direction::Short => (entry - price) / entry * 100.0,
    }
}

/// Offset `entry` by `pct` percent in (positive) or against (negative) the trade
fn shift(direction: Direction, entry: f64, pct: f64) -> f64 {
    match direction {
        Direction::Long => entry * (1.0 + pct / 100.0),
        Direction::Short => entry * (1.0 - pct / 100.0),
    }
}

/// Compute stop, target and risk:reward for `direction` from `entry`
pub fn calculate_targets(
    direction: Direction,
    entry: f64,
    atr: f64,
    structure: &StructureReport,
    config: &TargetConfig,
) -> TargetPlan {
    let (take_profit, target_source) = take_profit(direction, entry, atr, structure, config);
    let (stop_loss, stop_source) = stop_loss(direction, entry, atr, structure, config);

    let target_pct = favourable_pct(direction, entry, take_profit);
    let stop_pct = -favourable_pct(direction, entry, stop_loss);
    let risk_reward = if stop_pct > 0.0 {
        target_pct / stop_pct
    } else {
        0.0
    };

    TargetPlan {
        stop_loss,
        take_profit,
        stop_pct,
        target_pct,
        risk_reward,
        target_source,
        stop_source,
    }
}

fn take_profit(
    direction: Direction,
    entry: f64,
    atr: f64,
    structure: &StructureReport,
    config: &TargetConfig,
) -> (f64, TargetSource) {
    let (zones, blocks, gaps) = match direction {
        Direction::Long => (
            &structure.liquidity.above,
            &structure.order_blocks.bearish,
            &structure.gaps.bearish,
        ),
        Direction::Short => (
            &structure.liquidity.below,
            &structure.order_blocks.bullish,
            &structure.gaps.bullish,
        ),
    };

    let candidates = zones
        .iter()
        .map(|z| Level {
            price: z.price,
            strength: z.strength,
            source: TargetSource::Liquidity,
        })
        .chain(blocks.iter().map(|b| Level {
            price: b.midpoint(),
            strength: b.strength,
            source: TargetSource::OrderBlock,
        }))
        .chain(gaps.iter().map(|g| Level {
            price: g.midpoint(),
            strength: g.strength,
            source: TargetSource::Gap,
        }));

    // Best strength per percent of distance inside the allowed band
    let best = candidates
        .filter_map(|level| {
            let distance = favourable_pct(direction, entry, level.price);
            (distance >= config.min_target_pct && distance <= config.max_target_pct)
                .then(|| (level, level.strength / distance))
        })
        .fold(None::<(Level<TargetSource>, f64)>, |best, current| match best {
            Some(b) if b.1 >= current.1 => Some(b),
            _ => Some(current),
        });

    match best {
        Some((level, _)) => (level.price, level.source),
        None => {
            let offset = atr * config.atr_target_multiplier;
            let price = match direction {
                Direction::Long => entry + offset,
                Direction::Short => entry - offset,
            };
            (price, TargetSource::AtrFallback)
        }
    }
}

fn stop_loss(
    direction: Direction,
    entry: f64,
    atr: f64,
    structure: &StructureReport,
    config: &TargetConfig,
) -> (f64, StopSource) {
    let invalidation: Vec<Level<StopSource>> = match direction {
        Direction::Long => structure
            .liquidity
            .below
            .iter()
            .map(|z| Level {
                price: z.price,
                strength: z.strength,
                source: StopSource::Liquidity,
            })
            .chain(structure.order_blocks.bullish.iter().map(|b| Level {
                price: b.low,
                strength: b.strength,
                source: StopSource::OrderBlock,
            }))
            .collect(),
        Direction::Short => structure
            .liquidity
            .above
            .iter()
            .map(|z| Level {
                price: z.price,
                strength: z.strength,
                source: StopSource::Liquidity,
            })
            .chain(structure.order_blocks.bearish.iter().map(|b| Level {
                price: b.high,
                strength: b.strength,
                source: StopSource::OrderBlock,
            }))
            .collect(),
    };

    let nearest = invalidation
        .iter()
        .filter(|level| favourable_pct(direction, entry, level.price) < 0.0)
        .min_by(|a, b| {
            (a.price - entry)
                .abs()
                .total_cmp(&(b.price - entry).abs())
        });

    let (raw_stop, source) = match nearest {
        Some(level) => {
            let buffer = entry * config.stop_buffer_pct / 100.0;
            let price = match direction {
                Direction::Long => level.price - buffer,
                Direction::Short => level.price + buffer,
            };
            (price, level.source)
        }
        None => {
            let offset = atr * config.atr_stop_multiplier;
            let price = match direction {
                Direction::Long => entry - offset,
                Direction::Short => entry + offset,
            };
            (price, StopSource::AtrFallback)
        }
    };

    // Clamp the stop distance to the allowed band
    let stop_pct = -favourable_pct(direction, entry, raw_stop);
    let stop = if stop_pct < config.min_stop_pct {
        shift(direction, entry, -config.min_stop_pct)
    } else if stop_pct > config.max_stop_pct {
        shift(direction, entry, -config.max_stop_pct)
    } else {
        raw_stop
    };

    (stop, source)
}
