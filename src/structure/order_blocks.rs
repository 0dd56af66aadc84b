//! Order blocks
//!
//! The last opposite-coloured candle before an impulsive move. A bearish
//! candle followed by a rally of at least `min_move` marks a bullish block and
//! vice versa. Blocks lose validity when a later candle closes through them or
//! when they have been retested too often.

use crate::error::AnalyzerError;
use crate::models::indicators::Candle;
use crate::models::structure::{BlockKind, OrderBlock, OrderBlockMap};
use crate::structure::{average_volume, days_between, ensure_analyzable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBlockConfig {
    /// Most recent candles scanned for blocks
    pub lookback: usize,
    /// Relative move required after the block candle
    pub min_move: f64,
    /// Candles after the block in which the move must happen
    pub move_window: usize,
    /// More tests than this invalidate a block
    pub max_tests: usize,
    pub max_blocks_per_side: usize,
}

impl Default for OrderBlockConfig {
    fn default() -> Self {
        Self {
            lookback: 100,
            min_move: 0.02,
            move_window: 10,
            max_tests: 3,
            max_blocks_per_side: 3,
        }
    }
}

/// Find, score and filter order blocks relative to `current_price`
pub fn detect_order_blocks(
    candles: &[Candle],
    current_price: f64,
    config: &OrderBlockConfig,
) -> Result<OrderBlockMap, AnalyzerError> {
    ensure_analyzable("order block", candles, current_price)?;
    if candles.len() < 5 {
        return Ok(OrderBlockMap::default());
    }

    let blocks = find_order_blocks(candles, config);
    let valid: Vec<OrderBlock> = blocks.into_iter().filter(|b| b.valid).collect();

    let mut bullish: Vec<OrderBlock> = valid
        .iter()
        .filter(|b| b.kind == BlockKind::Bullish && b.top < current_price)
        .cloned()
        .collect();
    bullish.sort_by(|a, b| b.top.total_cmp(&a.top));
    bullish.truncate(config.max_blocks_per_side);

    let mut bearish: Vec<OrderBlock> = valid
        .iter()
        .filter(|b| b.kind == BlockKind::Bearish && b.bottom > current_price)
        .cloned()
        .collect();
    bearish.sort_by(|a, b| a.bottom.total_cmp(&b.bottom));
    bearish.truncate(config.max_blocks_per_side);

    let nearest = valid
        .iter()
        .min_by(|a, b| {
            (a.midpoint() - current_price)
                .abs()
                .total_cmp(&(b.midpoint() - current_price).abs())
        })
        .cloned();

    Ok(OrderBlockMap {
        bullish,
        bearish,
        nearest,
    })
}

/// Every candidate block in the lookback, scored and validated, strongest first
pub fn find_order_blocks(candles: &[Candle], config: &OrderBlockConfig) -> Vec<OrderBlock> {
    let mut blocks = Vec::new();
    if candles.len() < 5 {
        return blocks;
    }

    let start = candles.len().saturating_sub(config.lookback).max(3);
    for index in start..candles.len() - 1 {
        if let Some(block) = block_at(candles, index, config) {
            blocks.push(block);
        }
    }

    let avg_volume = average_volume(candles);
    for block in &mut blocks {
        score_block(block, candles, avg_volume, config);
    }

    blocks.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    blocks
}

fn block_at(candles: &[Candle], index: usize, config: &OrderBlockConfig) -> Option<OrderBlock> {
    let candle = &candles[index];
    let window_end = (index + 1 + config.move_window).min(candles.len());
    let following = &candles[index + 1..window_end];

    let (kind, move_size) = if candle.is_bearish() && candle.low > 0.0 {
        let mut highest = candle.high;
        let mut found = None;
        for next in following {
            highest = highest.max(next.high);
            let move_size = (highest - candle.low) / candle.low;
            if move_size >= config.min_move {
                found = Some(move_size);
                break;
            }
        }
        (BlockKind::Bullish, found?)
    } else if candle.is_bullish() && candle.high > 0.0 {
        let mut lowest = candle.low;
        let mut found = None;
        for next in following {
            lowest = lowest.min(next.low);
            let move_size = (candle.high - lowest) / candle.high;
            if move_size >= config.min_move {
                found = Some(move_size);
                break;
            }
        }
        (BlockKind::Bearish, found?)
    } else {
        return None;
    };

    let (top, bottom) = match kind {
        BlockKind::Bullish => (candle.open, candle.close),
        BlockKind::Bearish => (candle.close, candle.open),
    };

    Some(OrderBlock {
        kind,
        index,
        top,
        bottom,
        high: candle.high,
        low: candle.low,
        move_size: move_size * 100.0,
        test_count: 0,
        tested: false,
        strength: 0.0,
        valid: true,
    })
}

fn score_block(block: &mut OrderBlock, candles: &[Candle], avg_volume: f64, config: &OrderBlockConfig) {
    let origin = &candles[block.index];
    let later = &candles[block.index + 1..];
    let reference_time = candles[candles.len() - 1].timestamp;

    let mut score = block.move_size.min(30.0);

    if origin.volume > avg_volume * 1.5 {
        score += 20.0;
    } else if origin.volume > avg_volume {
        score += 10.0;
    }

    let days = days_between(origin.timestamp, reference_time);
    if days < 1.0 {
        score += 15.0;
    } else if days < 7.0 {
        score += 10.0;
    } else if days < 30.0 {
        score += 5.0;
    }

    block.test_count = later
        .iter()
        .filter(|c| match block.kind {
            BlockKind::Bullish => c.low <= block.top && c.low >= block.bottom,
            BlockKind::Bearish => c.high >= block.bottom && c.high <= block.top,
        })
        .count();
    block.tested = block.test_count > 0;

    if block.test_count == 0 {
        score += 15.0;
    } else if block.test_count == 1 {
        score += 10.0;
    } else if block.test_count > config.max_tests {
        score -= 10.0;
        block.valid = false;
    }

    let closed_through = later.iter().any(|c| match block.kind {
        BlockKind::Bullish => c.close < block.bottom,
        BlockKind::Bearish => c.close > block.top,
    });
    if closed_through {
        block.valid = false;
        score = 0.0;
    }

    block.strength = score;
}
