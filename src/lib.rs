//! Confluence signal engine
//!
//! Turns a rolling candle window into a gated trade signal: indicators, regime,
//! strategy scoring, market structure, structural stop/target placement, score
//! and risk filtering, then a learned decision agent.

pub mod agent;
pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod regime;
pub mod services;
pub mod signals;
pub mod strategies;
pub mod structure;

pub use error::{
    AgentError, AnalyzerError, ConfigError, MarketDataError, NotifyError, SignalError, StoreError,
};
