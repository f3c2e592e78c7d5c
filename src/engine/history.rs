//! Bounded per-metric history.
//!
//! Series are never trimmed in place: every append builds a new series from
//! the previous one plus the new reading, keeping only the newest entries.

use crate::config::defaults::HISTORY_WINDOW;
use crate::types::{MetricSeries, Reading, ReadingSet, SensorSnapshot};

/// Append `reading` and keep the last [`HISTORY_WINDOW`] entries.
pub fn append(series: &MetricSeries, reading: Reading) -> MetricSeries {
    append_bounded(series, reading, HISTORY_WINDOW)
}

/// Append `reading` and keep the last `window` entries, oldest evicted first.
pub fn append_bounded(series: &MetricSeries, reading: Reading, window: usize) -> MetricSeries {
    MetricSeries::from_vec(bounded_append(series.as_slice(), reading, window))
}

/// Build the next snapshot: previous history plus one reading per metric.
pub fn advance(snapshot: &SensorSnapshot, set: ReadingSet, window: usize) -> SensorSnapshot {
    SensorSnapshot {
        flow: append_bounded(&snapshot.flow, set.flow, window),
        pressure: append_bounded(&snapshot.pressure, set.pressure, window),
        temperature: append_bounded(&snapshot.temperature, set.temperature, window),
        leak_probability: append_bounded(&snapshot.leak_probability, set.leak_probability, window),
    }
}

/// `items ++ [item]`, truncated from the front to at most `cap` entries.
pub(crate) fn bounded_append<T: Clone>(items: &[T], item: T, cap: usize) -> Vec<T> {
    let keep = cap.saturating_sub(1).min(items.len());
    let mut out = Vec::with_capacity(keep + 1);
    out.extend_from_slice(&items[items.len() - keep..]);
    if cap > 0 {
        out.push(item);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(value: f64) -> Reading {
        Reading::new(Utc::now(), value, "L/min")
    }

    fn series_of(values: &[f64]) -> MetricSeries {
        MetricSeries::from_vec(values.iter().map(|v| reading(*v)).collect())
    }

    #[test]
    fn test_append_below_capacity_keeps_everything() {
        let series = series_of(&[1.0, 2.0, 3.0]);
        let next = append(&series, reading(4.0));
        assert_eq!(next.values(), vec![1.0, 2.0, 3.0, 4.0]);
        // Original is untouched
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_append_at_capacity_evicts_exactly_oldest() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let series = series_of(&values);
        let next = append(&series, reading(10.0));
        assert_eq!(next.len(), 10);
        assert_eq!(next.values(), (1..=10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_length_never_exceeds_window() {
        let mut series = MetricSeries::new();
        for i in 0..50 {
            series = append(&series, reading(f64::from(i)));
            assert!(series.len() <= HISTORY_WINDOW);
        }
        assert_eq!(series.latest().map(|r| r.value), Some(49.0));
        assert_eq!(series.iter().next().map(|r| r.value), Some(40.0));
    }

    #[test]
    fn test_custom_window() {
        let series = series_of(&[1.0, 2.0, 3.0]);
        let next = append_bounded(&series, reading(4.0), 2);
        assert_eq!(next.values(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_bounded_append_zero_cap() {
        let out = bounded_append(&[1, 2, 3], 4, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_advance_appends_each_metric() {
        let now = Utc::now();
        let set = ReadingSet {
            flow: Reading::new(now, 101.0, "L/min"),
            pressure: Reading::new(now, 49.0, "PSI"),
            temperature: Reading::new(now, 20.5, "°C"),
            leak_probability: Reading::new(now, 0.011, "%"),
        };
        let snapshot = advance(&SensorSnapshot::default(), set, HISTORY_WINDOW);
        assert_eq!(snapshot.flow.values(), vec![101.0]);
        assert_eq!(snapshot.pressure.values(), vec![49.0]);
        assert_eq!(snapshot.temperature.values(), vec![20.5]);
        assert_eq!(snapshot.leak_probability.values(), vec![0.011]);
    }
}
