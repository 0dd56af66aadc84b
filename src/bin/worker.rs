//! Confluence Worker
//!
//! Long-running process: evaluates the configured symbols on a cron schedule,
//! tracks open signals and posts a daily summary.

use confluence::config::AppConfig;
use confluence::core::bootstrap::build_runtime;
use confluence::core::scheduler::EvaluationScheduler;
use confluence::logging;
use confluence::metrics::Metrics;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env()?;
    info!("Starting Confluence Worker");
    info!(environment = %config.environment, "Environment");
    info!(
        symbols = ?config.runtime.symbols,
        timeframe = %config.runtime.timeframe,
        profile = ?config.profile,
        min_score = config.engine.scoring.min_score,
        min_rr = config.engine.scoring.min_risk_reward,
        "Evaluating {} symbols every {} seconds",
        config.runtime.symbols.len(),
        config.eval_interval_seconds
    );

    let metrics = Arc::new(Metrics::new()?);
    let mut runtime = build_runtime(&config, Some(metrics)).await?;
    let scheduler = EvaluationScheduler::new(config.eval_interval_seconds)?;

    info!("Running initial evaluation cycle");
    runtime.run_cycle().await;

    scheduler
        .run_until(&mut runtime, async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Worker stopped");
    Ok(())
}
