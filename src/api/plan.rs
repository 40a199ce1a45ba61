use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error::ApiError, response::ApiResponse, AppState};
use crate::dataset::sample;
use crate::domain::{CostParameters, Hub, Instance, Source};
use crate::optimizer::{ActivationBound, PlanReport};

/// Body of POST /api/v1/plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub sources: Vec<Source>,
    pub hubs: Vec<Hub>,
    #[serde(default)]
    pub parameters: CostParameters,
    /// Overrides the server's configured big-M rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_bound: Option<ActivationBound>,
}

impl PlanRequest {
    pub fn sample() -> Self {
        Self {
            sources: sample::sources(),
            hubs: sample::hubs(),
            parameters: sample::parameters(),
            activation_bound: None,
        }
    }
}

/// GET /api/v1/sample - the built-in network as a ready-to-post request body
pub async fn get_sample() -> ApiResponse<PlanRequest> {
    let request = PlanRequest::sample();
    let count = request.sources.len() + request.hubs.len();
    ApiResponse::success(request).with_count(count)
}

/// POST /api/v1/plan - solve the posted network
pub async fn create_plan(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<ApiResponse<PlanReport>, ApiError> {
    let started = Instant::now();
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::info!(
        sources = request.sources.len(),
        hubs = request.hubs.len(),
        "plan requested"
    );

    let instance = Instance::builder()
        .sources(request.sources)
        .hubs(request.hubs)
        .parameters(request.parameters)
        .build()?;

    let planner = match request.activation_bound {
        Some(bound) => state.planner.with_activation_bound(bound),
        None => (*state.planner).clone(),
    };
    let report = planner.plan(&instance).await?;
    let flows = report.flows.len();

    Ok(ApiResponse::success(report)
        .with_count(flows)
        .with_duration(started.elapsed().as_millis() as u64))
}
