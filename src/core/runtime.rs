//! One evaluation cycle: track open signals, then evaluate each symbol in turn.

use crate::agent::{
    AgentAction, DecisionContexts, DecisionPolicy, DecisionState, Experience, PendingDecision,
    RewardConfig,
};
use crate::core::stats::PerformanceStats;
use crate::core::tracker::check_exit;
use crate::error::SignalError;
use crate::metrics::Metrics;
use crate::models::signal::{CandidateSignal, SignalRecord};
use crate::services::market_data::{
    fetch_candles_with_retry, fetch_price_with_retry, MarketDataProvider, RetryPolicy,
};
use crate::services::notifier::Notifier;
use crate::services::store::SignalStore;
use crate::signals::engine::{Evaluation, EvaluationOutcome, SignalEngine};
use crate::signals::message::{closure_message, signal_message};
use crate::signals::scoring::Rejection;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub symbols: Vec<String>,
    pub timeframe: String,
    pub candle_limit: usize,
    /// Pause between symbols, for exchange rate limits
    pub symbol_delay: Duration,
    pub retry: RetryPolicy,
    pub position_size_usdt: f64,
    /// Size multiplier when the agent flips the rule-based direction
    pub override_size_factor: f64,
    pub rewards: RewardConfig,
    pub agent_model_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTCUSDT".to_string()],
            timeframe: "15m".to_string(),
            candle_limit: 250,
            symbol_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            position_size_usdt: 100.0,
            override_size_factor: 0.5,
            rewards: RewardConfig::default(),
            agent_model_path: None,
        }
    }
}

/// What happened during one cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub evaluated: usize,
    pub skipped_open: usize,
    pub fetch_failures: usize,
    pub insufficient_data: usize,
    pub rejected: usize,
    pub held: usize,
    pub emitted: Vec<SignalRecord>,
    pub closed: Vec<SignalRecord>,
}

pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: SignalEngine,
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn SignalStore>,
    notifier: Arc<dyn Notifier>,
    policy: Box<dyn DecisionPolicy>,
    contexts: DecisionContexts,
    metrics: Option<Arc<Metrics>>,
    metrics_file: Option<PathBuf>,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        engine: SignalEngine,
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn SignalStore>,
        notifier: Arc<dyn Notifier>,
        policy: Box<dyn DecisionPolicy>,
    ) -> Self {
        Self {
            config,
            engine,
            provider,
            store,
            notifier,
            policy,
            contexts: DecisionContexts::new(),
            metrics: None,
            metrics_file: None,
        }
    }

    /// Record metrics, optionally writing them to `file` after every cycle
    pub fn with_metrics(mut self, metrics: Arc<Metrics>, file: Option<PathBuf>) -> Self {
        self.metrics = Some(metrics);
        self.metrics_file = file;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn contexts(&self) -> &DecisionContexts {
        &self.contexts
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();
        let mut report = CycleReport::default();

        info!(
            symbols = self.config.symbols.len(),
            policy = self.policy.name(),
            "Starting evaluation cycle"
        );

        self.track_open_signals(&mut report).await;

        let symbols = self.config.symbols.clone();
        for (i, symbol) in symbols.iter().enumerate() {
            self.evaluate_symbol(symbol, &mut report).await;
            if i + 1 < symbols.len() && !self.config.symbol_delay.is_zero() {
                tokio::time::sleep(self.config.symbol_delay).await;
            }
        }

        self.save_policy();

        let elapsed = started.elapsed();
        if let Some(metrics) = &self.metrics {
            metrics.cycles_total.inc();
            metrics.cycle_duration_seconds.observe(elapsed.as_secs_f64());
            if let Some(path) = &self.metrics_file {
                if let Err(e) = metrics.write_to_file(path) {
                    warn!(error = %e, path = %path.display(), "Failed to write metrics file");
                }
            }
        }

        info!(
            evaluated = report.evaluated,
            emitted = report.emitted.len(),
            closed = report.closed.len(),
            rejected = report.rejected,
            held = report.held,
            elapsed_ms = elapsed.as_millis() as u64,
            "Evaluation cycle finished"
        );
        report
    }

    /// Close signals whose stop or target was touched and feed outcomes to the agent
    pub async fn track_open_signals(&mut self, report: &mut CycleReport) {
        let open = match self.store.open_signals(None).await {
            Ok(open) => open,
            Err(e) => {
                error!(error = %e, "Failed to load open signals");
                return;
            }
        };

        for record in open {
            let Some(id) = record.id else {
                continue;
            };
            let Some(price) =
                fetch_price_with_retry(self.provider.as_ref(), &record.symbol, &self.config.retry).await
            else {
                continue;
            };

            let now = Utc::now();
            let Some(exit) = check_exit(&record, price, now) else {
                let floating = record.pnl_percent_at(price);
                debug!(
                    symbol = %record.symbol,
                    direction = %record.direction,
                    floating_pnl = floating,
                    "{} {} floating PnL {:.2}%",
                    record.symbol,
                    record.direction,
                    floating
                );
                self.learn_shaping(&record, floating);
                continue;
            };

            let closed = match self.store.close_signal(id, &exit).await {
                Ok(closed) => closed,
                Err(e) => {
                    error!(symbol = %record.symbol, id, error = %e, "Failed to close signal");
                    continue;
                }
            };

            info!(
                symbol = %closed.symbol,
                status = %exit.status,
                pnl_percent = exit.pnl_percent,
                pnl_usdt = exit.pnl_usdt,
                "{} closed with {}",
                closed.symbol,
                exit.status
            );
            if let Some(metrics) = &self.metrics {
                metrics
                    .positions_closed_total
                    .with_label_values(&[exit.status.as_str()])
                    .inc();
            }

            if let Err(e) = self.notifier.notify(&closure_message(&closed)).await {
                warn!(symbol = %closed.symbol, error = %e, "Failed to send closure notification");
            }

            let pending = self
                .contexts
                .get(&closed.symbol)
                .filter(|p| p.signal_id == Some(id))
                .is_some();
            if pending {
                if let Some(decision) = self.contexts.take(&closed.symbol) {
                    let reward = self.config.rewards.terminal_reward(
                        exit.status,
                        exit.pnl_percent,
                        now - decision.opened_at,
                    );
                    debug!(symbol = %closed.symbol, reward, "Terminal reward");
                    self.policy.learn(Experience {
                        state: decision.state.clone(),
                        action: decision.action,
                        reward,
                        next_state: decision.state,
                        terminal: true,
                    });
                }
            }

            report.closed.push(closed);
        }
    }

    fn learn_shaping(&mut self, record: &SignalRecord, floating_pnl: f64) {
        let Some(decision) = self
            .contexts
            .get(&record.symbol)
            .filter(|p| p.signal_id == record.id)
        else {
            return;
        };
        let reward = self.config.rewards.shaping_reward(floating_pnl);
        let experience = Experience {
            state: decision.state.clone(),
            action: decision.action,
            reward,
            next_state: decision.state.clone(),
            terminal: false,
        };
        self.policy.learn(experience);
    }

    async fn evaluate_symbol(&mut self, symbol: &str, report: &mut CycleReport) {
        match self.store.open_signals(Some(symbol)).await {
            Ok(open) if !open.is_empty() => {
                debug!(symbol = %symbol, "Position already open for {}, skipping", symbol);
                report.skipped_open += 1;
                return;
            }
            Ok(_) => {}
            Err(e) => warn!(symbol = %symbol, error = %e, "Could not check open signals"),
        }

        let candles = fetch_candles_with_retry(
            self.provider.as_ref(),
            symbol,
            &self.config.timeframe,
            self.config.candle_limit,
            &self.config.retry,
        )
        .await;
        if candles.is_empty() {
            report.fetch_failures += 1;
            if let Some(metrics) = &self.metrics {
                metrics.fetch_failures_total.inc();
            }
            return;
        }

        let imbalance = match self.provider.get_order_book_imbalance(symbol).await {
            Ok(imbalance) => imbalance,
            Err(e) => {
                debug!(symbol = %symbol, error = %e, "Order book unavailable");
                None
            }
        };

        let evaluation = match self.engine.evaluate(symbol, &candles, imbalance) {
            Ok(evaluation) => evaluation,
            Err(SignalError::InsufficientData { required, actual }) => {
                warn!(symbol = %symbol, required, actual, "Not enough candles for {}", symbol);
                report.insufficient_data += 1;
                return;
            }
        };
        report.evaluated += 1;

        let candidate = match &evaluation.outcome {
            EvaluationOutcome::Candidate(candidate) => candidate.clone(),
            EvaluationOutcome::Rejected(rejection) => {
                report.rejected += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.rejections_total.with_label_values(&[rejection.label()]).inc();
                }
                return;
            }
        };

        self.decide(&evaluation, candidate, report).await;
    }

    async fn decide(&mut self, evaluation: &Evaluation, candidate: CandidateSignal, report: &mut CycleReport) {
        let symbol = candidate.symbol.clone();
        let state = DecisionState::from_candidate(
            &evaluation.snapshot,
            &evaluation.regime,
            &evaluation.structure,
            &candidate,
        );
        let action = self.policy.act(&state);
        if let Some(metrics) = &self.metrics {
            metrics.agent_actions_total.with_label_values(&[action.as_str()]).inc();
        }

        let Some(direction) = action.direction() else {
            info!(symbol = %symbol, score = candidate.score, "Agent held {} candidate", symbol);
            self.policy.learn(Experience {
                state: state.clone(),
                action: AgentAction::Hold,
                reward: 0.0,
                next_state: state,
                terminal: true,
            });
            report.held += 1;
            return;
        };

        let (signal, size) = if direction == candidate.direction {
            (candidate, self.config.position_size_usdt)
        } else {
            info!(
                symbol = %symbol,
                from = %candidate.direction,
                to = %direction,
                "Agent overrode {} direction",
                symbol
            );
            (
                self.engine.retarget(&candidate, direction, &evaluation.structure),
                self.config.position_size_usdt * self.config.override_size_factor,
            )
        };

        let min_risk_reward = self.engine.config().scoring.min_risk_reward;
        if signal.risk_reward < min_risk_reward {
            let rejection = Rejection::RiskRewardBelowMinimum {
                risk_reward: signal.risk_reward,
                min: min_risk_reward,
            };
            info!(symbol = %symbol, action = %action, "Override rejected: {}", rejection);
            if let Some(metrics) = &self.metrics {
                metrics.rejections_total.with_label_values(&[rejection.label()]).inc();
            }
            self.policy.learn(Experience {
                state: state.clone(),
                action,
                reward: 0.0,
                next_state: state,
                terminal: true,
            });
            report.rejected += 1;
            return;
        }

        let mut record = SignalRecord::open(&signal, size, &self.config.timeframe);
        let persisted = match self.store.insert(&record).await {
            Ok(id) => {
                record.id = Some(id);
                true
            }
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Failed to persist signal, outcome will not be tracked");
                false
            }
        };

        info!(
            symbol = %symbol,
            direction = %record.direction,
            strategy = %record.strategy,
            regime = %record.regime,
            score = record.score,
            rr = signal.risk_reward,
            action = %action,
            "Signal {} {} @ {:.4}",
            record.direction,
            symbol,
            record.entry
        );
        if let Some(metrics) = &self.metrics {
            metrics
                .signals_total
                .with_label_values(&[record.direction.as_str(), record.strategy.as_str()])
                .inc();
        }

        if let Err(e) = self.notifier.notify(&signal_message(&record, action)).await {
            warn!(symbol = %symbol, error = %e, "Failed to send signal notification");
        }

        if persisted {
            self.contexts.record(
                &symbol,
                PendingDecision {
                    state,
                    action,
                    signal_id: record.id,
                    opened_at: Utc::now(),
                },
            );
        } else {
            self.contexts.take(&symbol);
        }
        report.emitted.push(record);
    }

    /// Post the daily performance summary, if anything has closed
    pub async fn send_daily_summary(&self) -> Option<PerformanceStats> {
        let records = match self.store.all_signals().await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Failed to load signals for daily summary");
                return None;
            }
        };
        let stats = PerformanceStats::from_records(&records);
        let message = stats.summary_message(Utc::now())?;

        info!(
            closed = stats.closed_signals,
            win_rate = stats.win_rate,
            pnl_usdt = stats.total_pnl_usdt,
            "Sending daily summary"
        );
        if let Err(e) = self.notifier.notify(&message).await {
            warn!(error = %e, "Failed to send daily summary");
        }
        Some(stats)
    }

    pub fn save_policy(&self) {
        let Some(path) = &self.config.agent_model_path else {
            return;
        };
        if let Err(e) = self.policy.save(path) {
            error!(error = %e, path = %path.display(), "Failed to save decision model");
        }
    }
}
