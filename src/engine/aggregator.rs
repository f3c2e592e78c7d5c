//! Status aggregator: folds breaches into the bounded status lists.

use std::sync::Arc;

use super::evaluator::Breach;
use super::history::bounded_append;
use crate::types::SystemStatus;

#[derive(Debug, Clone, Copy)]
pub struct StatusAggregator {
    max_alerts: usize,
    max_recommendations: usize,
}

impl StatusAggregator {
    pub fn new(max_alerts: usize, max_recommendations: usize) -> Self {
        Self {
            max_alerts,
            max_recommendations,
        }
    }

    /// Produce the next status.
    ///
    /// Without a breach the previous `Arc` is returned as-is. With one, health
    /// is forced to false (it is never restored here) and both lists keep
    /// only their newest entries in arrival order.
    pub fn apply(&self, prev: &Arc<SystemStatus>, breach: Option<Breach>) -> Arc<SystemStatus> {
        let Some(Breach {
            alert,
            recommendation,
        }) = breach
        else {
            return Arc::clone(prev);
        };

        Arc::new(SystemStatus {
            is_healthy: false,
            alerts: bounded_append(&prev.alerts, alert, self.max_alerts),
            recommendations: bounded_append(
                &prev.recommendations,
                recommendation,
                self.max_recommendations,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluator::ThresholdEvaluator;
    use crate::types::Reading;
    use chrono::Utc;

    fn breach(evaluator: &mut ThresholdEvaluator, value: f64) -> Breach {
        evaluator
            .evaluate(&Reading::new(Utc::now(), value, "%"))
            .expect("value above threshold")
    }

    #[test]
    fn test_no_breach_is_reference_stable() {
        let aggregator = StatusAggregator::new(5, 5);
        let prev = Arc::new(SystemStatus::default());
        let next = aggregator.apply(&prev, None);
        assert!(Arc::ptr_eq(&prev, &next));
    }

    #[test]
    fn test_breach_marks_unhealthy() {
        let aggregator = StatusAggregator::new(5, 5);
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let prev = Arc::new(SystemStatus::default());
        let next = aggregator.apply(&prev, Some(breach(&mut evaluator, 0.03)));
        assert!(!next.is_healthy);
        assert_eq!(next.alerts.len(), 1);
        assert_eq!(next.recommendations.len(), 1);
        // Previous status untouched
        assert!(prev.is_healthy);
    }

    #[test]
    fn test_seven_breaches_keep_last_five_in_order() {
        let aggregator = StatusAggregator::new(5, 5);
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let mut status = Arc::new(SystemStatus::default());
        let mut emitted_alerts = Vec::new();
        let mut emitted_recs = Vec::new();

        for i in 0..7 {
            let b = breach(&mut evaluator, 0.021 + f64::from(i) * 0.001);
            emitted_alerts.push(b.alert.id.clone());
            emitted_recs.push(b.recommendation.id.clone());
            status = aggregator.apply(&status, Some(b));
            assert!(status.alerts.len() <= 5);
            assert!(status.recommendations.len() <= 5);
        }

        let alert_ids: Vec<_> = status.alerts.iter().map(|a| a.id.clone()).collect();
        let rec_ids: Vec<_> = status.recommendations.iter().map(|r| r.id.clone()).collect();
        assert_eq!(alert_ids, emitted_alerts[2..]);
        assert_eq!(rec_ids, emitted_recs[2..]);
    }

    #[test]
    fn test_health_stays_false() {
        let aggregator = StatusAggregator::new(5, 5);
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let mut status = aggregator.apply(
            &Arc::new(SystemStatus::default()),
            Some(breach(&mut evaluator, 0.03)),
        );
        for _ in 0..10 {
            status = aggregator.apply(&status, None);
            assert!(!status.is_healthy);
        }
    }

    #[test]
    fn test_sample_entries_are_evicted_first() {
        let aggregator = StatusAggregator::new(5, 5);
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let mut status = Arc::new(SystemStatus::with_sample_entries(Utc::now()));
        for _ in 0..3 {
            status = aggregator.apply(&status, Some(breach(&mut evaluator, 0.04)));
        }
        // 3 samples + 3 breaches, only the oldest sample falls out
        assert_eq!(status.alerts.len(), 5);
        assert_eq!(status.alerts[0].id, "sample-2");
        assert_eq!(status.alerts[1].id, "sample-3");
        assert!(status.alerts[2..].iter().all(|a| a.id.starts_with("alert-")));

        status = aggregator.apply(&status, Some(breach(&mut evaluator, 0.04)));
        assert_eq!(status.alerts[0].id, "sample-3");
        assert!(status.alerts[1..].iter().all(|a| a.id.starts_with("alert-")));
    }
}
