//! Binance spot REST market data provider

use crate::error::MarketDataError;
use crate::models::indicators::Candle;
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const ORDER_BOOK_DEPTH: usize = 20;

pub struct BinanceMarketDataProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

#[derive(Debug, Deserialize)]
struct OrderBook {
    bids: Vec<[String; 2]>,
    asks: Vec<[String; 2]>,
}

impl BinanceMarketDataProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(MarketDataError::Transient(format!("{} returned {}", path, status)));
        }
        let response = response.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

fn number(value: &Value, field: &str) -> Result<f64, MarketDataError> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| MarketDataError::InvalidResponse(format!("bad {} value: {}", field, value)))
}

/// One `/api/v3/klines` row: `[open_time, open, high, low, close, volume, ...]`
fn parse_kline(row: &Value) -> Result<Candle, MarketDataError> {
    let fields = row
        .as_array()
        .filter(|f| f.len() >= 6)
        .ok_or_else(|| MarketDataError::InvalidResponse(format!("malformed kline: {}", row)))?;

    let open_time = fields[0]
        .as_i64()
        .ok_or_else(|| MarketDataError::InvalidResponse("kline open time is not an integer".into()))?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(open_time)
        .ok_or_else(|| MarketDataError::InvalidResponse(format!("kline time out of range: {}", open_time)))?;

    Ok(Candle::new(
        timestamp,
        number(&fields[1], "open")?,
        number(&fields[2], "high")?,
        number(&fields[3], "low")?,
        number(&fields[4], "close")?,
        number(&fields[5], "volume")?,
    ))
}

fn side_volume(levels: &[[String; 2]]) -> f64 {
    levels
        .iter()
        .filter_map(|[_, qty]| qty.parse::<f64>().ok())
        .sum()
}

#[async_trait]
impl MarketDataProvider for BinanceMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let body = self
            .get_json(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", timeframe.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let rows = body
            .as_array()
            .ok_or_else(|| MarketDataError::InvalidResponse("klines response is not an array".into()))?;
        let candles = rows.iter().map(parse_kline).collect::<Result<Vec<_>, _>>()?;

        debug!(symbol = %symbol, count = candles.len(), "Fetched {} candles for {}", candles.len(), symbol);
        Ok(candles)
    }

    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let body = self
            .get_json("/api/v3/ticker/price", &[("symbol", symbol.to_string())])
            .await?;
        let ticker: TickerPrice = serde_json::from_value(body)
            .map_err(|e| MarketDataError::InvalidResponse(e.to_string()))?;
        ticker
            .price
            .parse::<f64>()
            .map_err(|e| MarketDataError::InvalidResponse(format!("bad price '{}': {}", ticker.price, e)))
    }

    async fn get_order_book_imbalance(&self, symbol: &str) -> Result<Option<f64>, MarketDataError> {
        let body = self
            .get_json(
                "/api/v3/depth",
                &[("symbol", symbol.to_string()), ("limit", ORDER_BOOK_DEPTH.to_string())],
            )
            .await?;
        let book: OrderBook = serde_json::from_value(body)
            .map_err(|e| MarketDataError::InvalidResponse(e.to_string()))?;

        let bids = side_volume(&book.bids);
        let asks = side_volume(&book.asks);
        let total = bids + asks;
        if total <= 0.0 {
            return Ok(None);
        }
        Ok(Some((bids - asks) / total * 100.0))
    }
}
