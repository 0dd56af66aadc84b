//! Environment-driven configuration

use crate::agent::{DqnConfig, RewardConfig};
use crate::core::runtime::RuntimeConfig;
use crate::error::ConfigError;
use crate::indicators::MIN_CANDLES;
use crate::services::binance::DEFAULT_BASE_URL;
use crate::services::market_data::RetryPolicy;
use crate::signals::{DeploymentProfile, EngineConfig, ScoringConfig};
use crate::strategies::StrategyWeights;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SYMBOLS: [&str; 10] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT", "ADAUSDT", "DOGEUSDT", "MATICUSDT",
    "LTCUSDT", "LINKUSDT",
];

/// Deployment environment from `APP_ENV`, `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Comma-separated symbol list, upper-cased, empties and repeats dropped
pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_ascii_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

/// Read and validate a JSON strategy weight file
pub fn load_weights(path: &Path) -> Result<StrategyWeights, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let weights: StrategyWeights = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    weights.validate().map_err(|reason| ConfigError::Invalid {
        key: "STRATEGY_WEIGHTS_FILE",
        reason,
    })?;
    Ok(weights)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub eval_interval_seconds: u64,
    pub profile: DeploymentProfile,
    pub engine: EngineConfig,
    pub runtime: RuntimeConfig,
    pub agent_enabled: bool,
    pub agent: DqnConfig,
    pub telegram: Option<TelegramConfig>,
    pub database_url: Option<String>,
    pub binance_base_url: String,
    pub metrics_file: Option<PathBuf>,
}

impl AppConfig {
    /// Build from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let symbols = env_opt("SYMBOLS")
            .map(|raw| parse_symbols(&raw))
            .unwrap_or_else(|| DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect());
        if symbols.is_empty() {
            return Err(ConfigError::Invalid {
                key: "SYMBOLS",
                reason: "no symbols configured".to_string(),
            });
        }

        let candle_limit: usize = env_or("CANDLE_LIMIT", 250);
        if candle_limit < MIN_CANDLES {
            return Err(ConfigError::Invalid {
                key: "CANDLE_LIMIT",
                reason: format!("must be at least {}, got {}", MIN_CANDLES, candle_limit),
            });
        }

        let eval_interval_seconds: u64 = env_or("EVAL_INTERVAL_SECONDS", 900);
        if eval_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "EVAL_INTERVAL_SECONDS",
                reason: "must be > 0".to_string(),
            });
        }

        let profile = match env_opt("SIGNAL_PROFILE") {
            None => DeploymentProfile::Standard,
            Some(raw) => DeploymentProfile::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "SIGNAL_PROFILE",
                reason: format!("expected 'standard' or 'conservative', got '{}'", raw),
            })?,
        };
        let mut scoring = ScoringConfig::for_profile(profile);
        scoring.min_score = env_or("MIN_SCORE", scoring.min_score);
        scoring.min_risk_reward = env_or("MIN_RISK_REWARD", scoring.min_risk_reward);

        let weights = match env_opt("STRATEGY_WEIGHTS_FILE") {
            Some(path) => load_weights(Path::new(&path))?,
            None => StrategyWeights::default(),
        };

        let override_size_factor: f64 = env_or("OVERRIDE_SIZE_FACTOR", 0.5);
        if !(override_size_factor > 0.0 && override_size_factor <= 1.0) {
            return Err(ConfigError::Invalid {
                key: "OVERRIDE_SIZE_FACTOR",
                reason: format!("must be in (0, 1], got {}", override_size_factor),
            });
        }

        let runtime = RuntimeConfig {
            symbols,
            timeframe: env_opt("TIMEFRAME").unwrap_or_else(|| "15m".to_string()),
            candle_limit,
            symbol_delay: Duration::from_millis(env_or("SYMBOL_DELAY_MS", 500)),
            retry: RetryPolicy {
                max_attempts: env_or("FETCH_MAX_ATTEMPTS", 3usize).max(1),
                min_delay: Duration::from_millis(env_or("FETCH_RETRY_DELAY_MS", 2000)),
            },
            position_size_usdt: env_or("POSITION_SIZE_USDT", 100.0),
            override_size_factor,
            rewards: RewardConfig::default(),
            agent_model_path: env_opt("AGENT_MODEL_PATH").map(PathBuf::from),
        };

        let telegram = match (env_opt("TELEGRAM_BOT_TOKEN"), env_opt("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig { token, chat_id }),
            _ => None,
        };

        Ok(Self {
            environment: get_environment(),
            eval_interval_seconds,
            profile,
            engine: EngineConfig {
                weights,
                scoring,
                ..EngineConfig::default()
            },
            runtime,
            agent_enabled: env_or("AGENT_ENABLED", true),
            agent: DqnConfig::default(),
            telegram,
            database_url: env_opt("DATABASE_URL"),
            binance_base_url: env_opt("BINANCE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            metrics_file: env_opt("METRICS_FILE").map(PathBuf::from),
        })
    }
}
