//! Point tables for the strategy generators.
//!
//! Defaults reproduce the production tables; a JSON file can replace them
//! (`STRATEGY_WEIGHTS_FILE`).

use serde::{Deserialize, Serialize};

fn ensure_non_negative(table: &str, entries: &[(&str, f64)]) -> Result<(), String> {
    for (name, value) in entries {
        if !value.is_finite() || *value < 0.0 {
            return Err(format!(
                "{} weight '{}' must be a non-negative number, got: {}",
                table, name, value
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumWeights {
    pub ema_alignment: f64,
    pub macd_cross: f64,
    pub rsi_band: f64,
    pub volume: f64,
    pub adx: f64,
    pub dmi: f64,
    pub obv: f64,
}

impl Default for MomentumWeights {
    fn default() -> Self {
        Self {
            ema_alignment: 20.0,
            macd_cross: 20.0,
            rsi_band: 15.0,
            volume: 15.0,
            adx: 15.0,
            dmi: 10.0,
            obv: 5.0,
        }
    }
}

impl MomentumWeights {
    pub fn new(
        ema_alignment: f64,
        macd_cross: f64,
        rsi_band: f64,
        volume: f64,
        adx: f64,
        dmi: f64,
        obv: f64,
    ) -> Result<Self, String> {
        let weights = Self {
            ema_alignment,
            macd_cross,
            rsi_band,
            volume,
            adx,
            dmi,
            obv,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), String> {
        ensure_non_negative(
            "momentum",
            &[
                ("ema_alignment", self.ema_alignment),
                ("macd_cross", self.macd_cross),
                ("rsi_band", self.rsi_band),
                ("volume", self.volume),
                ("adx", self.adx),
                ("dmi", self.dmi),
                ("obv", self.obv),
            ],
        )
    }

    /// Highest score one side can reach
    pub fn max_score(&self) -> f64 {
        self.ema_alignment
            + self.macd_cross
            + self.rsi_band
            + self.volume
            + self.adx
            + self.dmi
            + self.obv
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionWeights {
    pub band_touch: f64,
    pub rsi_extreme: f64,
    pub stoch_rsi_cross: f64,
}

impl Default for MeanReversionWeights {
    fn default() -> Self {
        Self {
            band_touch: 25.0,
            rsi_extreme: 25.0,
            stoch_rsi_cross: 20.0,
        }
    }
}

impl MeanReversionWeights {
    pub fn new(band_touch: f64, rsi_extreme: f64, stoch_rsi_cross: f64) -> Result<Self, String> {
        let weights = Self {
            band_touch,
            rsi_extreme,
            stoch_rsi_cross,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), String> {
        ensure_non_negative(
            "mean reversion",
            &[
                ("band_touch", self.band_touch),
                ("rsi_extreme", self.rsi_extreme),
                ("stoch_rsi_cross", self.stoch_rsi_cross),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutWeights {
    pub band_break_with_volume: f64,
    pub rsi_momentum: f64,
}

impl Default for BreakoutWeights {
    fn default() -> Self {
        Self {
            band_break_with_volume: 30.0,
            rsi_momentum: 20.0,
        }
    }
}

impl BreakoutWeights {
    pub fn new(band_break_with_volume: f64, rsi_momentum: f64) -> Result<Self, String> {
        let weights = Self {
            band_break_with_volume,
            rsi_momentum,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), String> {
        ensure_non_negative(
            "breakout",
            &[
                ("band_break_with_volume", self.band_break_with_volume),
                ("rsi_momentum", self.rsi_momentum),
            ],
        )
    }
}

/// All three tables, as loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyWeights {
    pub momentum: MomentumWeights,
    pub mean_reversion: MeanReversionWeights,
    pub breakout: BreakoutWeights,
}

impl StrategyWeights {
    pub fn validate(&self) -> Result<(), String> {
        self.momentum.validate()?;
        self.mean_reversion.validate()?;
        self.breakout.validate()
    }
}
