//! One-shot scan: a single evaluation cycle over the configured symbols.
//!
//! Useful for checking configuration and connectivity before starting the worker.

use confluence::config::AppConfig;
use confluence::core::bootstrap::build_runtime;
use confluence::logging;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env()?;
    info!(environment = %config.environment, "Confluence one-shot scan");

    let mut runtime = build_runtime(&config, None).await?;
    let report = runtime.run_cycle().await;

    println!(
        "Evaluated {} symbols: {} signals, {} rejected, {} held, {} skipped (open), {} fetch failures",
        report.evaluated,
        report.emitted.len(),
        report.rejected,
        report.held,
        report.skipped_open,
        report.fetch_failures
    );
    for signal in &report.emitted {
        println!(
            "  {} {} {} entry {:.4} stop {:.4} target {:.4} score {:.0}",
            signal.symbol, signal.direction, signal.strategy, signal.entry, signal.stop, signal.target, signal.score
        );
    }
    for closed in &report.closed {
        println!(
            "  closed {} {} {:+.2}%",
            closed.symbol,
            closed.status,
            closed.pnl_percent.unwrap_or(0.0)
        );
    }
    Ok(())
}
