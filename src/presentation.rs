//! Dashboard view model
//!
//! Turns the published snapshot, status and control settings into
//! render-ready data: chart series with `T-n` labels, metric cards with
//! formatted values and trends, and alert/recommendation lists with
//! human-relative timestamps. No rendering happens here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{
    Alert, AlertKind, AreaId, Metric, MetricSeries, Priority, Recommendation, SensorSnapshot,
    SimulationConfig, SystemStatus,
};

pub const LOADING_TEXT: &str = "Loading...";
pub const NO_ALERTS_TEXT: &str = "No alerts at this time";
pub const NO_RECOMMENDATIONS_TEXT: &str = "No recommendations at this time";

// ============================================================================
// View Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub metric: Metric,
    pub title: &'static str,
    pub kind: ChartKind,
    pub color: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub metric: Metric,
    pub title: &'static str,
    /// `"{value:.2} {unit}"`, or the loading text for an empty series
    pub value: String,
    pub loading: bool,
    /// Latest minus previous reading
    pub trend: Option<f64>,
    /// Relative age of the latest reading
    pub updated: Option<String>,
    pub sparkline: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaView {
    pub id: &'static str,
    pub name: &'static str,
}

impl From<AreaId> for AreaView {
    fn from(area: AreaId) -> Self {
        Self {
            id: area.id(),
            name: area.display_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub time: String,
    pub age: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub time: String,
    pub age: String,
}

/// A list panel: items newest last, or the message to show when empty.
#[derive(Debug, Clone, Serialize)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub empty_message: Option<&'static str>,
}

impl<T> ListView<T> {
    fn new(items: Vec<T>, empty_text: &'static str) -> Self {
        let empty_message = items.is_empty().then_some(empty_text);
        Self {
            items,
            empty_message,
        }
    }
}

/// Everything the dashboard renders for one frame
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub running: bool,
    pub area: AreaView,
    pub interval_ms: u64,
    pub healthy: bool,
    pub loading: bool,
    pub charts: Vec<ChartView>,
    pub cards: Vec<CardView>,
    pub alerts: ListView<AlertItem>,
    pub recommendations: ListView<RecommendationItem>,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Building
// ============================================================================

impl DashboardView {
    pub fn build(
        config: SimulationConfig,
        snapshot: &SensorSnapshot,
        status: &SystemStatus,
        now: DateTime<Utc>,
    ) -> Self {
        let labels = chart_labels(&snapshot.flow);

        let charts = vec![
            chart(snapshot, Metric::Flow, "Water Flow (L/min)", ChartKind::Line, "rgba(0, 123, 255, 0.8)", &labels),
            chart(snapshot, Metric::Pressure, "Pressure (psi)", ChartKind::Line, "rgba(255, 99, 132, 0.8)", &labels),
            chart(snapshot, Metric::Temperature, "Temperature (°C)", ChartKind::Bar, "rgba(75, 192, 192, 0.8)", &labels),
        ];

        let cards = Metric::ALL
            .into_iter()
            .map(|metric| card(metric, snapshot.series(metric), now))
            .collect();

        let alerts = status.alerts.iter().map(|a| alert_item(a, now)).collect();
        let recommendations = status
            .recommendations
            .iter()
            .map(|r| recommendation_item(r, now))
            .collect();

        Self {
            running: config.running,
            area: config.area.into(),
            interval_ms: config.interval_ms,
            healthy: status.is_healthy,
            loading: snapshot.is_empty(),
            charts,
            cards,
            alerts: ListView::new(alerts, NO_ALERTS_TEXT),
            recommendations: ListView::new(recommendations, NO_RECOMMENDATIONS_TEXT),
            generated_at: now,
        }
    }
}

/// `T-n … T-1`, oldest first
pub fn chart_labels(series: &MetricSeries) -> Vec<String> {
    let n = series.len();
    (0..n).map(|i| format!("T-{}", n - i)).collect()
}

fn chart(
    snapshot: &SensorSnapshot,
    metric: Metric,
    title: &'static str,
    kind: ChartKind,
    color: &'static str,
    labels: &[String],
) -> ChartView {
    ChartView {
        metric,
        title,
        kind,
        color,
        labels: labels.to_vec(),
        values: snapshot.series(metric).values(),
    }
}

fn card(metric: Metric, series: &MetricSeries, now: DateTime<Utc>) -> CardView {
    let Some(latest) = series.latest() else {
        return CardView {
            metric,
            title: metric.display_name(),
            value: LOADING_TEXT.to_string(),
            loading: true,
            trend: None,
            updated: None,
            sparkline: Vec::new(),
        };
    };

    CardView {
        metric,
        title: metric.display_name(),
        value: latest.formatted(),
        loading: false,
        trend: series.previous().map(|prev| latest.value - prev.value),
        updated: Some(format_relative(latest.timestamp, now)),
        sparkline: series.values(),
    }
}

fn alert_item(alert: &Alert, now: DateTime<Utc>) -> AlertItem {
    AlertItem {
        id: alert.id.clone(),
        kind: alert.kind,
        message: alert.message.clone(),
        time: format_absolute(alert.timestamp),
        age: format_relative(alert.timestamp, now),
    }
}

fn recommendation_item(rec: &Recommendation, now: DateTime<Utc>) -> RecommendationItem {
    RecommendationItem {
        id: rec.id.clone(),
        title: rec.title.clone(),
        description: rec.description.clone(),
        priority: rec.priority,
        time: format_absolute(rec.timestamp),
        age: format_relative(rec.timestamp, now),
    }
}

// ============================================================================
// Time Formatting
// ============================================================================

pub fn format_absolute(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Human-relative age of `ts` as seen at `now`.
///
/// Timestamps in the future (clock skew) read as "just now". Anything a day
/// or older falls back to the absolute date.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds();
    match secs {
        s if s < 5 => "just now".to_string(),
        s if s < 60 => format!("{s}s ago"),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        _ => ts.format("%Y-%m-%d").to_string(),
    }
}
