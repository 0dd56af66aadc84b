//! Binance REST provider against a mocked exchange

use confluence::error::MarketDataError;
use confluence::models::indicators::Candle;
use confluence::services::{
    fetch_candles_with_retry, BinanceMarketDataProvider, MarketDataProvider, RetryPolicy,
};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::*;

fn provider(server: &MockServer) -> BinanceMarketDataProvider {
    BinanceMarketDataProvider::with_client(server.uri(), reqwest::Client::new())
}

/// Kline rows as the exchange sends them: strings for prices and volume
pub fn klines_body(candles: &[Candle]) -> Value {
    Value::Array(
        candles
            .iter()
            .map(|c| {
                let open_time = c.timestamp.timestamp_millis();
                json!([
                    open_time,
                    c.open.to_string(),
                    c.high.to_string(),
                    c.low.to_string(),
                    c.close.to_string(),
                    c.volume.to_string(),
                    open_time + 899_999,
                    "0",
                    10,
                    "0",
                    "0",
                    "0"
                ])
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_fetches_klines() {
    let server = MockServer::start().await;
    let candles = uptrend_candles(3);
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "15m"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines_body(&candles)))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = provider(&server).get_candles("BTCUSDT", "15m", 3).await.unwrap();

    assert_eq!(fetched, candles);
}

#[tokio::test]
async fn test_latest_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "ETHUSDT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"symbol": "ETHUSDT", "price": "2250.75"})),
        )
        .mount(&server)
        .await;

    let price = provider(&server).get_latest_price("ETHUSDT").await.unwrap();
    assert_eq!(price, 2250.75);
}

#[tokio::test]
async fn test_order_book_imbalance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lastUpdateId": 1,
            "bids": [["100.0", "3.0"], ["99.5", "1.0"]],
            "asks": [["100.5", "1.0"]]
        })))
        .mount(&server)
        .await;

    let imbalance = provider(&server).get_order_book_imbalance("BTCUSDT").await.unwrap();
    assert_eq!(imbalance, Some(60.0));
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider(&server).get_latest_price("BTCUSDT").await.unwrap_err();
    assert!(matches!(err, MarketDataError::Transient(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_client_errors_are_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})))
        .mount(&server)
        .await;

    let err = provider(&server).get_latest_price("NOPE").await.unwrap_err();
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_kline_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[1, "1.0"]])))
        .mount(&server)
        .await;

    let err = provider(&server).get_candles("BTCUSDT", "15m", 1).await.unwrap_err();
    assert!(matches!(err, MarketDataError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failure() {
    let server = MockServer::start().await;
    let candles = uptrend_candles(2);
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines_body(&candles)))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 3,
        min_delay: Duration::from_millis(5),
    };
    let fetched = fetch_candles_with_retry(&provider(&server), "BTCUSDT", "15m", 2, &policy).await;

    assert_eq!(fetched.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_retry_gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 3,
        min_delay: Duration::from_millis(5),
    };
    let fetched = fetch_candles_with_retry(&provider(&server), "BTCUSDT", "15m", 250, &policy).await;

    assert!(fetched.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
