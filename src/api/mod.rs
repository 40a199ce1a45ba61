pub mod error;
pub mod health;
pub mod plan;
pub mod response;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, planner::Planner};

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/sample", get(plan::get_sample))
        .route("/plan", post(plan::create_plan))
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/api/v1", v1_router())
        .with_state(state);

    if cfg.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                // the sample network is ~4 KiB; leave room for national datasets
                .layer(axum::extract::DefaultBodyLimit::max(8 * 1024 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}
