use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    solver: SolverHealth,
}

#[derive(Debug, Serialize)]
pub struct SolverHealth {
    engine: &'static str,
    time_limit_secs: f64,
    activation_bound: String,
}

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let invoker = state.planner.invoker();
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        solver: SolverHealth {
            engine: invoker.engine_name(),
            time_limit_secs: invoker.time_limit().as_secs_f64(),
            activation_bound: state.planner.activation_bound().to_string(),
        },
    })
}
