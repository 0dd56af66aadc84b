//! Wires configured collaborators into a [`SignalRuntime`]

use crate::agent::build_policy;
use crate::config::AppConfig;
use crate::db::PostgresSignalStore;
use crate::metrics::Metrics;
use crate::services::binance::BinanceMarketDataProvider;
use crate::services::notifier::{LogNotifier, Notifier, TelegramNotifier};
use crate::services::store::{InMemorySignalStore, SignalStore};
use crate::signals::engine::SignalEngine;
use crate::core::runtime::SignalRuntime;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn build_runtime(
    config: &AppConfig,
    metrics: Option<Arc<Metrics>>,
) -> Result<SignalRuntime, Box<dyn std::error::Error + Send + Sync>> {
    let provider = Arc::new(BinanceMarketDataProvider::new(config.binance_base_url.clone())?);

    let store: Arc<dyn SignalStore> = match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");
            let store = PostgresSignalStore::connect(url)
                .await
                .map_err(|e| format!("DATABASE_URL is set but the connection failed: {}", e))?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, signals are kept in memory only");
            Arc::new(InMemorySignalStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(
            telegram.token.clone(),
            telegram.chat_id.clone(),
        )?),
        None => {
            warn!("Telegram not configured, notifications go to the log");
            Arc::new(LogNotifier)
        }
    };

    let policy = build_policy(
        config.agent_enabled,
        config.agent.clone(),
        config.runtime.agent_model_path.as_deref(),
    )?;
    info!(policy = policy.name(), "Decision policy ready");

    let runtime = SignalRuntime::new(
        config.runtime.clone(),
        SignalEngine::new(config.engine.clone()),
        provider,
        store,
        notifier,
        policy,
    );

    Ok(match metrics {
        Some(metrics) => runtime.with_metrics(metrics, config.metrics_file.clone()),
        None => runtime,
    })
}
