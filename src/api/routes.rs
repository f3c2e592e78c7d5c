//! API route definitions
//!
//! - /api/v1/dashboard - Render-ready view model
//! - /api/v1/snapshot - Raw bounded sensor history
//! - /api/v1/status - Health, alerts and recommendations
//! - /api/v1/control - Simulation controls (toggle, area, interval)
//! - /api/v1/areas - Service area catalogue

use axum::{routing::{get, post}, Router};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/snapshot", get(handlers::get_snapshot))
        .route("/status", get(handlers::get_status))
        .route("/areas", get(handlers::get_areas))
        .route("/control", get(handlers::get_control))
        .route("/control/toggle", post(handlers::toggle_running))
        .route("/control/area", post(handlers::set_area))
        .route("/control/interval", post(handlers::set_interval))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioScheduler;
    use crate::config::AquaConfig;
    use crate::control::SimulationController;
    use crate::engine::{EngineHandle, SimulationEngine};
    use crate::types::SimulationConfig;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tokio::runtime::Handle;
    use tower::ServiceExt;

    fn create_test_state() -> DashboardState {
        let mut config = AquaConfig::default();
        config.simulation.seed = Some(5);
        let engine = EngineHandle::new(SimulationEngine::new(&config));
        let controller = SimulationController::new(
            TokioScheduler::new(Handle::current()),
            engine.clone(),
            SimulationConfig::default(),
        );
        DashboardState::new(engine, controller)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_routes_snapshot() {
        let app = api_routes(create_test_state());
        let response = app.oneshot(get_req("/snapshot")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let v = body_json(response).await;
        assert_eq!(v["data"]["flow"].as_array().map(Vec::len), Some(1));
        assert_eq!(v["data"]["leak_probability"][0]["unit"], "%");
    }

    #[tokio::test]
    async fn test_api_routes_status_after_breach() {
        let state = create_test_state();
        state.engine.tick_with_leak(0.025);
        let app = api_routes(state);

        let v = body_json(app.oneshot(get_req("/status")).await.unwrap()).await;
        assert_eq!(v["data"]["is_healthy"], false);
        assert_eq!(v["data"]["alerts"][0]["type"], "warning");
        assert_eq!(
            v["data"]["alerts"][0]["message"],
            "Elevated leak probability detected: 2.50%"
        );
        assert_eq!(v["data"]["recommendations"][0]["priority"], "high");
    }

    #[tokio::test]
    async fn test_api_routes_dashboard() {
        let app = api_routes(create_test_state());
        let response = app.oneshot(get_req("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let v = body_json(response).await;
        assert_eq!(v["data"]["running"], false);
        assert_eq!(v["data"]["area"]["name"], "Residential Area");
        assert_eq!(v["data"]["charts"][0]["labels"][0], "T-1");
        assert_eq!(v["data"]["alerts"]["empty_message"], "No alerts at this time");
    }

    #[tokio::test]
    async fn test_api_routes_areas() {
        let app = api_routes(create_test_state());
        let v = body_json(app.oneshot(get_req("/areas")).await.unwrap()).await;
        let areas = v["data"].as_array().unwrap();
        assert_eq!(areas.len(), 6);
        assert_eq!(areas[1]["name"], "Commercial District");
    }

    #[tokio::test]
    async fn test_api_routes_toggle() {
        let state = create_test_state();
        let app = api_routes(state.clone());

        let v = body_json(app.clone().oneshot(post_json("/control/toggle", serde_json::json!({}))).await.unwrap()).await;
        assert_eq!(v["data"]["running"], true);
        assert_eq!(v["data"]["state"], "running");

        let v = body_json(app.oneshot(get_req("/control")).await.unwrap()).await;
        assert_eq!(v["data"]["running"], true);

        state.controller.lock().await.shutdown();
    }

    #[tokio::test]
    async fn test_api_routes_area_and_interval() {
        let app = api_routes(create_test_state());

        let response = app
            .clone()
            .oneshot(post_json("/control/area", serde_json::json!({"area": "Industrial"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["area"], "industrial");

        let response = app
            .clone()
            .oneshot(post_json("/control/area", serde_json::json!({"area": "harbour"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let v = body_json(
            app.oneshot(post_json("/control/interval", serde_json::json!({"interval_ms": 9000})))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(v["data"]["interval_ms"], 5000);
    }

    #[tokio::test]
    async fn test_health_routes() {
        let app = health_routes(create_test_state());
        let response = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["status"], "ok");
        assert_eq!(v["system_healthy"], true);
    }
}
