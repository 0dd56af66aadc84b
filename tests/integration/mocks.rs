//! In-process collaborators for runtime tests
#![allow(dead_code)]

use async_trait::async_trait;
use confluence::agent::{AgentAction, DecisionPolicy, DecisionState, Experience};
use confluence::core::RuntimeConfig;
use confluence::error::{MarketDataError, NotifyError, StoreError};
use confluence::models::indicators::Candle;
use confluence::models::signal::{SignalExit, SignalRecord};
use confluence::services::{MarketDataProvider, Notifier, RetryPolicy, SignalStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves a fixed candle window and a settable last price
pub struct MockProvider {
    candles: Vec<Candle>,
    price: Mutex<f64>,
    fail_candles: bool,
    pub candle_requests: AtomicUsize,
}

impl MockProvider {
    pub fn new(candles: Vec<Candle>) -> Self {
        let price = candles.last().map(|c| c.close).unwrap_or(0.0);
        Self {
            candles,
            price: Mutex::new(price),
            fail_candles: false,
            candle_requests: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_candles: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn set_price(&self, price: f64) {
        *self.price.lock().unwrap() = price;
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn get_candles(
        &self,
        _symbol: &str,
        _timeframe: &str,
        _limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        self.candle_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_candles {
            return Err(MarketDataError::Transient("connection reset".to_string()));
        }
        Ok(self.candles.clone())
    }

    async fn get_latest_price(&self, _symbol: &str) -> Result<f64, MarketDataError> {
        Ok(*self.price.lock().unwrap())
    }
}

/// Keeps every message it is asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Always answers with the same action and counts learning calls
pub struct FixedPolicy {
    pub action: AgentAction,
    pub experiences: Arc<Mutex<Vec<Experience>>>,
}

impl FixedPolicy {
    pub fn new(action: AgentAction) -> Self {
        Self {
            action,
            experiences: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl DecisionPolicy for FixedPolicy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn act(&mut self, _state: &DecisionState) -> AgentAction {
        self.action
    }

    fn learn(&mut self, experience: Experience) {
        self.experiences.lock().unwrap().push(experience);
    }
}

/// Store whose writes always fail; reads see nothing
pub struct FailingStore;

#[async_trait]
impl SignalStore for FailingStore {
    async fn insert(&self, _record: &SignalRecord) -> Result<i64, StoreError> {
        Err(StoreError::InvalidRow("disk full".to_string()))
    }

    async fn open_signals(&self, _symbol: Option<&str>) -> Result<Vec<SignalRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn close_signal(&self, id: i64, _exit: &SignalExit) -> Result<SignalRecord, StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn all_signals(&self) -> Result<Vec<SignalRecord>, StoreError> {
        Ok(Vec::new())
    }
}

/// Single symbol, no pacing and millisecond retries
pub fn fast_config(symbol: &str) -> RuntimeConfig {
    RuntimeConfig {
        symbols: vec![symbol.to_string()],
        symbol_delay: Duration::ZERO,
        retry: RetryPolicy {
            max_attempts: 2,
            min_delay: Duration::from_millis(1),
        },
        ..RuntimeConfig::default()
    }
}
