//! Cron-driven evaluation loop with a daily summary tick

use crate::core::runtime::SignalRuntime;
use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::future::Future;
use std::str::FromStr;
use tracing::{info, warn};

/// Every day at 23:59:00 UTC
pub const DAILY_SUMMARY_CRON: &str = "0 59 23 * * *";

/// Cron expression (with seconds) firing every `interval_seconds`
///
/// Steps must divide evenly into a single cron field: seconds below a minute,
/// whole minutes below an hour, or whole hours below a day.
pub fn cron_expression(interval_seconds: u64) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "EVAL_INTERVAL_SECONDS",
        reason,
    };

    match interval_seconds {
        0 => Err(invalid("scheduler disabled: interval is 0".to_string())),
        1..=59 => Ok(format!("*/{} * * * * *", interval_seconds)),
        s if s % 3600 == 0 && s / 3600 < 24 => Ok(format!("0 0 */{} * * *", s / 3600)),
        s if s % 60 == 0 && s / 60 < 60 => Ok(format!("0 */{} * * * *", s / 60)),
        s => Err(invalid(format!(
            "{}s is not whole seconds below 60, whole minutes below 60 or whole hours below 24",
            s
        ))),
    }
}

enum Tick {
    Evaluate,
    Summary,
}

pub struct EvaluationScheduler {
    evaluation: Schedule,
    summary: Schedule,
    cron_expr: String,
}

impl EvaluationScheduler {
    pub fn new(interval_seconds: u64) -> Result<Self, ConfigError> {
        let cron_expr = cron_expression(interval_seconds)?;
        let evaluation = Schedule::from_str(&cron_expr).map_err(|e| ConfigError::Invalid {
            key: "EVAL_INTERVAL_SECONDS",
            reason: format!("invalid cron expression '{}': {}", cron_expr, e),
        })?;
        let summary = Schedule::from_str(DAILY_SUMMARY_CRON).map_err(|e| ConfigError::Invalid {
            key: "EVAL_INTERVAL_SECONDS",
            reason: format!("invalid summary schedule: {}", e),
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "Scheduler created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            evaluation,
            summary,
            cron_expr,
        })
    }

    pub fn cron_expr(&self) -> &str {
        &self.cron_expr
    }

    pub fn next_evaluation(&self) -> Option<DateTime<Utc>> {
        self.evaluation.upcoming(Utc).next()
    }

    fn next_tick(&self) -> Option<(DateTime<Utc>, Tick)> {
        let evaluate = self.evaluation.upcoming(Utc).next();
        let summary = self.summary.upcoming(Utc).next();
        match (evaluate, summary) {
            (Some(e), Some(s)) if s < e => Some((s, Tick::Summary)),
            (Some(e), _) => Some((e, Tick::Evaluate)),
            (None, Some(s)) => Some((s, Tick::Summary)),
            (None, None) => None,
        }
    }

    /// Drive `runtime` on this task until `shutdown` resolves.
    /// A cycle in progress is finished before shutdown is honoured.
    pub async fn run_until<F>(&self, runtime: &mut SignalRuntime, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Scheduler started, waiting for cron schedule...");

        loop {
            let Some((at, tick)) = self.next_tick() else {
                warn!("Schedule has no upcoming ticks, stopping");
                break;
            };
            let wait = (at - Utc::now()).to_std().unwrap_or_default();

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    break;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            match tick {
                Tick::Evaluate => {
                    runtime.run_cycle().await;
                }
                Tick::Summary => {
                    runtime.send_daily_summary().await;
                }
            }
        }

        runtime.save_policy();
        info!("Scheduler stopped");
    }
}
