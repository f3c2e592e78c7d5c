//! API request handlers
//!
//! Readers (`dashboard`, `snapshot`, `status`) load the engine's published
//! state without touching the tick path. Control endpoints serialise through
//! the controller mutex.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::envelope::{ApiError, ApiResponse};
use crate::clock::ClockState;
use crate::control::SimulationController;
use crate::engine::{EngineHandle, EngineStats};
use crate::presentation::{AreaView, DashboardView};
use crate::types::{AreaId, SimulationConfig};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Published engine state (lock-free reads)
    pub engine: EngineHandle,
    /// Clock and area controls
    pub controller: Arc<Mutex<SimulationController>>,
    pub started_at: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(engine: EngineHandle, controller: SimulationController) -> Self {
        Self {
            engine,
            controller: Arc::new(Mutex::new(controller)),
            started_at: Utc::now(),
        }
    }

    fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

// ============================================================================
// Response / Request Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    pub system_healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct ControlResponse {
    #[serde(flatten)]
    pub config: SimulationConfig,
    pub state: ClockState,
    pub stats: EngineStats,
}

#[derive(Debug, Deserialize)]
pub struct SetAreaRequest {
    pub area: String,
}

#[derive(Debug, Deserialize)]
pub struct SetIntervalRequest {
    pub interval_ms: u64,
}

fn control_response(controller: &SimulationController, engine: &EngineHandle) -> ControlResponse {
    ControlResponse {
        config: controller.config(),
        state: controller.state(),
        stats: engine.stats(),
    }
}

// ============================================================================
// Read Endpoints
// ============================================================================

/// GET /health
pub async fn health_check(State(state): State<DashboardState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
        system_healthy: state.engine.status().is_healthy,
    })
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<DashboardState>) -> Response {
    let config = state.controller.lock().await.config();
    let view = DashboardView::build(
        config,
        &state.engine.snapshot(),
        &state.engine.status(),
        Utc::now(),
    );
    ApiResponse::ok(view)
}

/// GET /api/v1/snapshot
pub async fn get_snapshot(State(state): State<DashboardState>) -> Response {
    let snapshot = state.engine.snapshot();
    ApiResponse::ok(snapshot.as_ref())
}

/// GET /api/v1/status
pub async fn get_status(State(state): State<DashboardState>) -> Response {
    let status = state.engine.status();
    ApiResponse::ok(status.as_ref())
}

/// GET /api/v1/control
pub async fn get_control(State(state): State<DashboardState>) -> Response {
    let controller = state.controller.lock().await;
    ApiResponse::ok(control_response(&controller, &state.engine))
}

/// GET /api/v1/areas
pub async fn get_areas() -> Response {
    let areas: Vec<AreaView> = AreaId::ALL.into_iter().map(AreaView::from).collect();
    ApiResponse::ok(areas)
}

// ============================================================================
// Control Endpoints
// ============================================================================

/// POST /api/v1/control/toggle
pub async fn toggle_running(State(state): State<DashboardState>) -> Response {
    let mut controller = state.controller.lock().await;
    controller.toggle_running();
    ApiResponse::ok(control_response(&controller, &state.engine))
}

/// POST /api/v1/control/area
pub async fn set_area(
    State(state): State<DashboardState>,
    body: Result<Json<SetAreaRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let area = AreaId::parse(&request.area).ok_or(ApiError::UnknownArea(request.area))?;

    let mut controller = state.controller.lock().await;
    controller.set_area(area);
    Ok(ApiResponse::ok(control_response(&controller, &state.engine)))
}

/// POST /api/v1/control/interval
pub async fn set_interval(
    State(state): State<DashboardState>,
    body: Result<Json<SetIntervalRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let mut controller = state.controller.lock().await;
    controller.set_interval(request.interval_ms);
    Ok(ApiResponse::ok(control_response(&controller, &state.engine)))
}
