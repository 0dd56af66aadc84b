//! Error taxonomy for the signal pipeline and its collaborators.
//!
//! Nothing in here is fatal to the worker except [`ConfigError`]. Score and
//! risk:reward rejections are not errors; see `signals::scoring::Rejection`.

use thiserror::Error;

/// Failures raised while turning candles into a candidate signal.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("insufficient data: need {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}

/// A structure analyzer could not produce a result for this window.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("{analyzer} analyzer unavailable: {reason}")]
    Unavailable {
        analyzer: &'static str,
        reason: String,
    },
}

impl AnalyzerError {
    pub fn unavailable(analyzer: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            analyzer,
            reason: reason.into(),
        }
    }
}

/// Market data collaborator failures.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("transient fetch error: {0}")]
    Transient(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from market data provider: {0}")]
    InvalidResponse(String),

    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },
}

impl MarketDataError {
    /// Whether another attempt may succeed (timeouts, resets, 5xx, 429).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e
                        .status()
                        .map(|s| s.is_server_error() || s.as_u16() == 429)
                        .unwrap_or(false)
            }
            Self::InvalidResponse(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// Notification delivery failures. Logged by the runtime, never propagated.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Persistent store failures (PersistenceWriteError in the runtime logs).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("signal {0} not found")]
    NotFound(i64),

    #[error("failed to encode signal field: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("stored row is not a valid signal: {0}")]
    InvalidRow(String),
}

/// Invalid configuration at start-up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decision agent persistence failures
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to access model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize model: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("model shape mismatch: expected {expected} inputs and 3 outputs, found {found}")]
    Shape { expected: usize, found: String },
}
