//! Threshold evaluator for the leak-probability metric.
//!
//! A reading strictly above the threshold produces exactly one warning alert
//! and one high-priority inspection recommendation. There is no hysteresis
//! or debouncing: every breaching tick raises a new pair.

use chrono::{DateTime, Utc};

use crate::types::{Alert, AlertKind, Priority, Reading, Recommendation};

pub const LEAK_RECOMMENDATION_TITLE: &str = "Investigate Potential Leak";
pub const LEAK_RECOMMENDATION_DESCRIPTION: &str = "Recent sensor data indicates an increased probability of a leak. Schedule an inspection of the system.";

/// Alert/recommendation pair raised by a single breach
#[derive(Debug, Clone, PartialEq)]
pub struct Breach {
    pub alert: Alert,
    pub recommendation: Recommendation,
}

// ============================================================================
// Id Sequence
// ============================================================================

/// Monotonic id source for alerts and recommendations.
///
/// Ids never repeat within one engine, however close together breaches occur.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{:06}", self.next)
    }
}

// ============================================================================
// Evaluator
// ============================================================================

#[derive(Debug)]
pub struct ThresholdEvaluator {
    threshold: f64,
    ids: IdSequence,
}

impl ThresholdEvaluator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ids: IdSequence::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Inspect the newest leak-probability reading, timestamping any breach now.
    pub fn evaluate(&mut self, latest_leak: &Reading) -> Option<Breach> {
        self.evaluate_at(latest_leak, Utc::now())
    }

    pub fn evaluate_at(&mut self, latest_leak: &Reading, now: DateTime<Utc>) -> Option<Breach> {
        if latest_leak.value <= self.threshold {
            return None;
        }

        let alert = Alert {
            id: self.ids.next_id("alert"),
            kind: AlertKind::Warning,
            message: format!(
                "Elevated leak probability detected: {:.2}%",
                latest_leak.value * 100.0
            ),
            timestamp: now,
        };
        let recommendation = Recommendation {
            id: self.ids.next_id("rec"),
            title: LEAK_RECOMMENDATION_TITLE.to_string(),
            description: LEAK_RECOMMENDATION_DESCRIPTION.to_string(),
            priority: Priority::High,
            timestamp: now,
        };

        Some(Breach {
            alert,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak(value: f64) -> Reading {
        Reading::new(Utc::now(), value, "%")
    }

    #[test]
    fn test_breach_at_two_and_a_half_percent() {
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let breach = evaluator.evaluate(&leak(0.025)).expect("0.025 must breach");

        assert_eq!(breach.alert.kind, AlertKind::Warning);
        assert_eq!(breach.alert.message, "Elevated leak probability detected: 2.50%");
        assert_eq!(breach.recommendation.title, "Investigate Potential Leak");
        assert_eq!(breach.recommendation.priority, Priority::High);
        assert_eq!(breach.recommendation.description, LEAK_RECOMMENDATION_DESCRIPTION);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut evaluator = ThresholdEvaluator::new(0.02);
        assert!(evaluator.evaluate(&leak(0.02)).is_none());
        assert!(evaluator.evaluate(&leak(0.0125)).is_none());
        assert!(evaluator.evaluate(&leak(0.020_001)).is_some());
    }

    #[test]
    fn test_breach_timestamped_now() {
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let now = Utc::now();
        let breach = evaluator.evaluate_at(&leak(0.05), now).unwrap();
        assert_eq!(breach.alert.timestamp, now);
        assert_eq!(breach.recommendation.timestamp, now);
    }

    #[test]
    fn test_ids_unique_within_same_instant() {
        let mut evaluator = ThresholdEvaluator::new(0.02);
        let now = Utc::now();
        let mut ids = Vec::new();
        for _ in 0..20 {
            let breach = evaluator.evaluate_at(&leak(0.03), now).unwrap();
            ids.push(breach.alert.id);
            ids.push(breach.recommendation.id);
        }
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_id_format() {
        let mut ids = IdSequence::new();
        assert_eq!(ids.next_id("alert"), "alert-000001");
        assert_eq!(ids.next_id("rec"), "rec-000002");
    }
}
