//! PostgreSQL signal store

use crate::error::StoreError;
use crate::models::signal::{Direction, SignalExit, SignalRecord, SignalStatus};
use crate::services::store::SignalStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

const COLUMNS: &str = "id, timestamp, symbol, direction, regime, strategy, entry, stop, target, size, \
     status, exit_price, exit_time, pnl_percent, pnl_usdt, score, atr, reasons, timeframe";

pub struct PostgresSignalStore {
    client: Arc<RwLock<Client>>,
}

impl PostgresSignalStore {
    /// Connect and create the schema if needed
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        let store = Self {
            client: Arc::new(RwLock::new(client)),
        };
        store.init_schema().await?;
        info!("PostgreSQL signal store ready");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.client.read().await;
        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS signals (
                    id BIGSERIAL PRIMARY KEY,
                    timestamp TIMESTAMPTZ NOT NULL,
                    symbol TEXT NOT NULL,
                    direction TEXT NOT NULL,
                    regime TEXT NOT NULL,
                    strategy TEXT NOT NULL,
                    entry DOUBLE PRECISION NOT NULL,
                    stop DOUBLE PRECISION NOT NULL,
                    target DOUBLE PRECISION NOT NULL,
                    size DOUBLE PRECISION NOT NULL,
                    status TEXT NOT NULL,
                    exit_price DOUBLE PRECISION,
                    exit_time TIMESTAMPTZ,
                    pnl_percent DOUBLE PRECISION,
                    pnl_usdt DOUBLE PRECISION,
                    score DOUBLE PRECISION NOT NULL,
                    atr DOUBLE PRECISION NOT NULL,
                    reasons TEXT NOT NULL,
                    timeframe TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS signals_status_symbol ON signals (status, symbol);",
            )
            .await?;
        Ok(())
    }
}

fn record_from_row(row: &Row) -> Result<SignalRecord, StoreError> {
    let direction: String = row.try_get("direction")?;
    let status: String = row.try_get("status")?;
    let reasons: String = row.try_get("reasons")?;

    Ok(SignalRecord {
        id: Some(row.try_get("id")?),
        timestamp: row.try_get("timestamp")?,
        symbol: row.try_get("symbol")?,
        direction: Direction::parse(&direction)
            .ok_or_else(|| StoreError::InvalidRow(format!("unknown direction '{}'", direction)))?,
        regime: row.try_get("regime")?,
        strategy: row.try_get("strategy")?,
        entry: row.try_get("entry")?,
        stop: row.try_get("stop")?,
        target: row.try_get("target")?,
        size: row.try_get("size")?,
        status: SignalStatus::parse(&status)
            .ok_or_else(|| StoreError::InvalidRow(format!("unknown status '{}'", status)))?,
        exit_price: row.try_get("exit_price")?,
        exit_time: row.try_get("exit_time")?,
        pnl_percent: row.try_get("pnl_percent")?,
        pnl_usdt: row.try_get("pnl_usdt")?,
        score: row.try_get("score")?,
        atr: row.try_get("atr")?,
        reasons: serde_json::from_str(&reasons)?,
        timeframe: row.try_get("timeframe")?,
    })
}

#[async_trait]
impl SignalStore for PostgresSignalStore {
    async fn insert(&self, record: &SignalRecord) -> Result<i64, StoreError> {
        let reasons = serde_json::to_string(&record.reasons)?;
        let client = self.client.read().await;
        let row = client
            .query_one(
                "INSERT INTO signals (timestamp, symbol, direction, regime, strategy, entry, stop, target, size,
                     status, exit_price, exit_time, pnl_percent, pnl_usdt, score, atr, reasons, timeframe)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
                 RETURNING id",
                &[
                    &record.timestamp,
                    &record.symbol,
                    &record.direction.as_str(),
                    &record.regime,
                    &record.strategy,
                    &record.entry,
                    &record.stop,
                    &record.target,
                    &record.size,
                    &record.status.as_str(),
                    &record.exit_price,
                    &record.exit_time,
                    &record.pnl_percent,
                    &record.pnl_usdt,
                    &record.score,
                    &record.atr,
                    &reasons,
                    &record.timeframe,
                ],
            )
            .await?;
        Ok(row.try_get("id")?)
    }

    async fn open_signals(&self, symbol: Option<&str>) -> Result<Vec<SignalRecord>, StoreError> {
        let client = self.client.read().await;
        let open = SignalStatus::Open.as_str();
        let rows = match symbol {
            Some(symbol) => {
                client
                    .query(
                        &format!(
                            "SELECT {} FROM signals WHERE status = $1 AND symbol = $2 ORDER BY timestamp",
                            COLUMNS
                        ),
                        &[&open, &symbol],
                    )
                    .await?
            }
            None => {
                client
                    .query(
                        &format!("SELECT {} FROM signals WHERE status = $1 ORDER BY timestamp", COLUMNS),
                        &[&open],
                    )
                    .await?
            }
        };
        rows.iter().map(record_from_row).collect()
    }

    async fn close_signal(&self, id: i64, exit: &SignalExit) -> Result<SignalRecord, StoreError> {
        let client = self.client.read().await;
        let row = client
            .query_opt(
                &format!(
                    "UPDATE signals SET status = $2, exit_price = $3, exit_time = $4, pnl_percent = $5, pnl_usdt = $6
                     WHERE id = $1 RETURNING {}",
                    COLUMNS
                ),
                &[
                    &id,
                    &exit.status.as_str(),
                    &exit.exit_price,
                    &exit.exit_time,
                    &exit.pnl_percent,
                    &exit.pnl_usdt,
                ],
            )
            .await?
            .ok_or(StoreError::NotFound(id))?;
        record_from_row(&row)
    }

    async fn all_signals(&self) -> Result<Vec<SignalRecord>, StoreError> {
        let client = self.client.read().await;
        let rows = client
            .query(&format!("SELECT {} FROM signals ORDER BY timestamp", COLUMNS), &[])
            .await?;
        rows.iter().map(record_from_row).collect()
    }
}
