//! External collaborators: market data, notifications, signal persistence.

pub mod binance;
pub mod market_data;
pub mod notifier;
pub mod store;

pub use binance::BinanceMarketDataProvider;
pub use market_data::{fetch_candles_with_retry, fetch_price_with_retry, MarketDataProvider, RetryPolicy};
pub use notifier::{LogNotifier, Notifier, TelegramNotifier};
pub use store::{InMemorySignalStore, SignalStore};
