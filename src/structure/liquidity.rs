//! Liquidity pools
//!
//! Swing highs and lows cluster where stops accumulate. Clusters with enough
//! touches become zones, psychological round numbers near price are added, and
//! every zone is scored for the current window.

use crate::error::AnalyzerError;
use crate::models::indicators::Candle;
use crate::models::structure::{LiquidityMap, LiquidityZone, ZoneSide};
use crate::structure::{average_volume, days_between, ensure_analyzable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityConfig {
    /// Candles on each side of a swing point
    pub swing_lookback: usize,
    /// Relative price band for clustering
    pub cluster_tolerance: f64,
    pub min_touches: usize,
    /// Round numbers further than this (relative) are ignored
    pub round_number_range: f64,
    pub tested_lookback: usize,
    pub tested_tolerance: f64,
    pub max_zones_per_side: usize,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            swing_lookback: 5,
            cluster_tolerance: 0.005,
            min_touches: 2,
            round_number_range: 0.1,
            tested_lookback: 20,
            tested_tolerance: 0.002,
            max_zones_per_side: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingKind {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwingPoint {
    pub kind: SwingKind,
    pub price: f64,
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub volume: f64,
}

/// Swing points merged within a tolerance band; `price` is the members' mean
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCluster {
    pub price: f64,
    pub members: Vec<SwingPoint>,
}

impl PriceCluster {
    fn from_point(point: SwingPoint) -> Self {
        Self {
            price: point.price,
            members: vec![point],
        }
    }

    fn absorb(&mut self, mut other: PriceCluster) {
        self.members.append(&mut other.members);
        self.members.sort_by_key(|m| m.index);
        self.price = self.members.iter().map(|m| m.price).sum::<f64>() / self.members.len() as f64;
    }
}

/// Strict local extrema over `lookback` candles on each side
pub fn detect_swing_points(candles: &[Candle], lookback: usize) -> Vec<SwingPoint> {
    let mut points = Vec::new();
    if lookback == 0 || candles.len() < lookback * 2 + 1 {
        return points;
    }

    for i in lookback..candles.len() - lookback {
        let current = &candles[i];
        let neighbours = (i - lookback..=i + lookback).filter(|&j| j != i);

        if neighbours.clone().all(|j| candles[j].high < current.high) {
            points.push(SwingPoint {
                kind: SwingKind::High,
                price: current.high,
                index: i,
                timestamp: current.timestamp,
                volume: current.volume,
            });
        }
        if neighbours.clone().all(|j| candles[j].low > current.low) {
            points.push(SwingPoint {
                kind: SwingKind::Low,
                price: current.low,
                index: i,
                timestamp: current.timestamp,
                volume: current.volume,
            });
        }
    }

    points
}

fn within(a: f64, b: f64, tolerance: f64) -> bool {
    let larger = a.abs().max(b.abs());
    larger == 0.0 || (a - b).abs() / larger <= tolerance
}

/// Group points whose prices lie within `tolerance` of a cluster
///
/// After the greedy pass, clusters closer than the tolerance are merged until
/// none remain, so clustering the resulting prices again is a no-op.
pub fn cluster_swing_points(points: &[SwingPoint], tolerance: f64) -> Vec<PriceCluster> {
    let mut clusters: Vec<PriceCluster> = Vec::new();

    for point in points {
        match clusters
            .iter_mut()
            .find(|c| within(point.price, c.price, tolerance))
        {
            Some(cluster) => cluster.absorb(PriceCluster::from_point(point.clone())),
            None => clusters.push(PriceCluster::from_point(point.clone())),
        }
    }

    loop {
        let pair = (0..clusters.len()).find_map(|i| {
            (i + 1..clusters.len())
                .find(|&j| within(clusters[i].price, clusters[j].price, tolerance))
                .map(|j| (i, j))
        });
        match pair {
            Some((i, j)) => {
                let other = clusters.remove(j);
                clusters[i].absorb(other);
            }
            None => break,
        }
    }

    clusters
}

/// Round price levels within `range` of `price`, deduplicated
pub fn round_number_levels(price: f64, range: f64) -> Vec<f64> {
    let mut levels: Vec<f64> = Vec::new();
    if price <= 0.0 || !price.is_finite() {
        return levels;
    }

    let magnitude = 10f64.powf(price.log10().floor());
    for mult in [0.5, 1.0, 2.0, 5.0, 10.0] {
        let step = magnitude * mult;
        let level = (price / step).round() * step;
        let duplicate = levels.iter().any(|l| (l - level).abs() <= f64::EPSILON * price);
        if (level - price).abs() / price < range && !duplicate {
            levels.push(level);
        }
    }
    levels
}

fn zone_side(price: f64, current_price: f64) -> ZoneSide {
    if price > current_price {
        ZoneSide::Above
    } else if price < current_price {
        ZoneSide::Below
    } else {
        ZoneSide::At
    }
}

/// Detect, score and organize liquidity zones around `current_price`
pub fn analyze_liquidity(
    candles: &[Candle],
    current_price: f64,
    config: &LiquidityConfig,
) -> Result<LiquidityMap, AnalyzerError> {
    ensure_analyzable("liquidity", candles, current_price)?;
    let Some(last) = candles.last() else {
        return Ok(LiquidityMap::default());
    };
    let reference_time = last.timestamp;
    let overall_volume = average_volume(candles);
    let recent = &candles[candles.len().saturating_sub(config.tested_lookback)..];

    let swings = detect_swing_points(candles, config.swing_lookback);
    let mut clusters: Vec<PriceCluster> = cluster_swing_points(&swings, config.cluster_tolerance)
        .into_iter()
        .filter(|c| c.members.len() >= config.min_touches)
        .collect();

    let round_levels = round_number_levels(current_price, config.round_number_range);
    for &level in &round_levels {
        if !clusters.iter().any(|c| (c.price - level).abs() / level < 0.001) {
            clusters.push(PriceCluster {
                price: level,
                members: Vec::new(),
            });
        }
    }

    let mut zones: Vec<LiquidityZone> = clusters
        .iter()
        .map(|cluster| {
            let is_round_number =
                cluster.members.is_empty() && round_levels.iter().any(|l| *l == cluster.price);
            let tested = recent
                .iter()
                .any(|c| (c.close - cluster.price).abs() / cluster.price < config.tested_tolerance);

            LiquidityZone {
                price: cluster.price,
                side: zone_side(cluster.price, current_price),
                touch_count: cluster.members.len(),
                is_round_number,
                tested,
                strength: score_zone(cluster, is_round_number, tested, overall_volume, reference_time),
            }
        })
        .collect();

    zones.sort_by(|a, b| b.strength.total_cmp(&a.strength));

    let mut above: Vec<LiquidityZone> = zones
        .iter()
        .filter(|z| z.side == ZoneSide::Above)
        .cloned()
        .collect();
    above.sort_by(|a, b| a.price.total_cmp(&b.price));
    above.truncate(config.max_zones_per_side);

    let mut below: Vec<LiquidityZone> = zones
        .iter()
        .filter(|z| z.side == ZoneSide::Below)
        .cloned()
        .collect();
    below.sort_by(|a, b| b.price.total_cmp(&a.price));
    below.truncate(config.max_zones_per_side);

    let nearest = zones
        .iter()
        .min_by(|a, b| {
            (a.price - current_price)
                .abs()
                .total_cmp(&(b.price - current_price).abs())
        })
        .cloned();

    Ok(LiquidityMap {
        above,
        below,
        nearest,
        strongest: zones.first().cloned(),
    })
}

fn score_zone(
    cluster: &PriceCluster,
    is_round_number: bool,
    tested: bool,
    overall_volume: f64,
    reference_time: DateTime<Utc>,
) -> f64 {
    let mut score = cluster.members.len() as f64 * 10.0;

    if is_round_number {
        score += 15.0;
    }

    if let Some(last_touch) = cluster.members.iter().max_by_key(|m| m.index) {
        let days = days_between(last_touch.timestamp, reference_time);
        score += (20.0 - days * 2.0).max(0.0);

        let touch_volume = cluster.members.iter().map(|m| m.volume).sum::<f64>()
            / cluster.members.len() as f64;
        if touch_volume > overall_volume * 1.5 {
            score += 10.0;
        }
    }

    if !tested {
        score += 10.0;
    }

    score
}
