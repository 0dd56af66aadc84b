//! Unit tests for Prometheus metrics and logging helpers

use confluence::logging::is_production;
use confluence::metrics::Metrics;

#[test]
fn test_export_contains_recorded_series() {
    let metrics = Metrics::new().unwrap();
    metrics.cycles_total.inc();
    metrics
        .signals_total
        .with_label_values(&["LONG", "Momentum"])
        .inc();
    metrics.rejections_total.with_label_values(&["score"]).inc();
    metrics.cycle_duration_seconds.observe(1.2);

    let body = metrics.export().unwrap();
    assert!(body.contains("confluence_cycles_total 1"));
    assert!(body.contains(r#"confluence_signals_total{direction="LONG",strategy="Momentum"} 1"#));
    assert!(body.contains(r#"confluence_rejections_total{reason="score"} 1"#));
    assert!(body.contains("confluence_cycle_duration_seconds_count 1"));
}

#[test]
fn test_write_to_file() {
    let metrics = Metrics::new().unwrap();
    metrics.fetch_failures_total.inc();
    let path = std::env::temp_dir().join(format!("confluence-metrics-{}.prom", std::process::id()));

    metrics.write_to_file(&path).unwrap();
    let body = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(body.contains("confluence_fetch_failures_total 1"));
}

#[test]
fn test_production_environments() {
    assert!(is_production("production"));
    assert!(is_production("prod"));
    assert!(!is_production("sandbox"));
}
