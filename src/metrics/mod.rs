//! Prometheus metrics for the evaluation worker
//!
//! All metrics use the `confluence_` prefix.

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    pub cycles_total: Counter,
    /// Emitted signals by direction and strategy
    pub signals_total: CounterVec,
    /// Candidates dropped by the filter, by reason
    pub rejections_total: CounterVec,
    pub fetch_failures_total: Counter,
    pub agent_actions_total: CounterVec,
    /// Closed positions by outcome (TP_HIT / SL_HIT)
    pub positions_closed_total: CounterVec,
    pub cycle_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = Counter::with_opts(Opts::new(
            "confluence_cycles_total",
            "Completed evaluation cycles",
        ))?;
        registry.register(Box::new(cycles_total.clone()))?;

        let signals_total = CounterVec::new(
            Opts::new("confluence_signals_total", "Emitted signals"),
            &["direction", "strategy"],
        )?;
        registry.register(Box::new(signals_total.clone()))?;

        let rejections_total = CounterVec::new(
            Opts::new("confluence_rejections_total", "Rejected candidates by reason"),
            &["reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        let fetch_failures_total = Counter::with_opts(Opts::new(
            "confluence_fetch_failures_total",
            "Symbols skipped because market data was unavailable",
        ))?;
        registry.register(Box::new(fetch_failures_total.clone()))?;

        let agent_actions_total = CounterVec::new(
            Opts::new("confluence_agent_actions_total", "Decision agent actions"),
            &["action"],
        )?;
        registry.register(Box::new(agent_actions_total.clone()))?;

        let positions_closed_total = CounterVec::new(
            Opts::new("confluence_positions_closed_total", "Closed positions by outcome"),
            &["status"],
        )?;
        registry.register(Box::new(positions_closed_total.clone()))?;

        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "confluence_cycle_duration_seconds",
                "Wall time of one evaluation cycle",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            cycles_total,
            signals_total,
            rejections_total,
            fetch_failures_total,
            agent_actions_total,
            positions_closed_total,
            cycle_duration_seconds,
        })
    }

    /// Text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Write the exposition for a textfile collector, replacing the file atomically
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let body = self
            .export()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let tmp = path.with_extension("prom.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, path)
    }
}
