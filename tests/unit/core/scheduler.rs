//! Unit tests for cron scheduling

use chrono::Utc;
use confluence::core::scheduler::{cron_expression, DAILY_SUMMARY_CRON};
use confluence::core::EvaluationScheduler;
use confluence::error::ConfigError;

#[test]
fn test_cron_expression() {
    assert_eq!(cron_expression(30).unwrap(), "*/30 * * * * *");
    assert_eq!(cron_expression(900).unwrap(), "0 */15 * * * *");
    assert_eq!(cron_expression(3600).unwrap(), "0 0 */1 * * *");
    assert_eq!(cron_expression(14400).unwrap(), "0 0 */4 * * *");
}

#[test]
fn test_cron_expression_rejects_uneven_intervals() {
    for interval in [90, 5400, 86400, 0] {
        assert!(
            matches!(cron_expression(interval), Err(ConfigError::Invalid { .. })),
            "interval {} should be rejected",
            interval
        );
    }
    assert!(EvaluationScheduler::new(90).is_err());
}

#[test]
fn test_scheduler_creation() {
    let scheduler = EvaluationScheduler::new(900).unwrap();
    assert_eq!(scheduler.cron_expr(), "0 */15 * * * *");

    let next = scheduler.next_evaluation().unwrap();
    assert!(next > Utc::now());
    assert!(next - Utc::now() <= chrono::Duration::minutes(15));
}

#[test]
fn test_zero_interval_disables_scheduler() {
    assert!(matches!(
        EvaluationScheduler::new(0),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_summary_runs_at_end_of_day() {
    assert_eq!(DAILY_SUMMARY_CRON, "0 59 23 * * *");
}
