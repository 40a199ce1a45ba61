use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use feedstock_hub_optimizer::{
    api::{self, plan::PlanRequest, AppState},
    config::Config,
    Planner,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    app_with(&Config::default())
}

fn app_with(config: &Config) -> Router {
    api::router(AppState::new(Planner::default()), config)
}

async fn call(request: Request<Body>) -> (StatusCode, Value) {
    call_app(app(), request).await
}

async fn call_app(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_plan(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/plan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn small_network(minimum: f64) -> Value {
    json!({
        "sources": [
            { "Site Reference": "S1", "X Coordinates": 52.0, "Y Coordinates": -1.5,
              "Available Quantity (tonnes/year)": 100.0 },
            { "reference": "S2", "latitude": 52.0, "longitude": -1.5, "available_quantity": 50.0 }
        ],
        "hubs": [
            { "Site Reference": "H1", "X Coordinates": 52.0, "Y Coordinates": -1.5,
              "Cost of Heat (£/kWh)": 0.05, "Max Capacity (tonnes/year)": 200.0 }
        ],
        "parameters": {
            "minimum_total_production": minimum,
            "haulage_cost_per_tonne_km": 0.01,
            "generic_capex": 1000.0,
            "heat_required_per_tonne": 1.0
        }
    })
}

#[tokio::test]
async fn healthz_reports_solver() {
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, body) = call(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["solver"]["engine"], "microlp");
    assert_eq!(body["solver"]["activation_bound"], "total_supply");
}

#[tokio::test]
async fn sample_is_a_postable_request() {
    let request = Request::builder().uri("/api/v1/sample").body(Body::empty()).unwrap();
    let (status, body) = call(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sources"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"]["hubs"][3]["Site Reference"], "Hub04");
    assert_eq!(body["metadata"]["total_count"], 20);
}

#[tokio::test]
async fn plan_returns_report() {
    let (status, body) = call(post_plan(small_network(70.0))).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["status"], "optimal");
    assert_eq!(data["hubs"][0]["active"], true);
    let total = data["costs"]["total"].as_f64().unwrap();
    assert!((total - 1003.5).abs() < 1e-4);
    assert!(body["metadata"]["duration_ms"].is_u64());
}

#[tokio::test]
async fn activation_bound_can_be_overridden() {
    let mut request = small_network(70.0);
    request["activation_bound"] = json!("hub_capacity");
    let (status, body) = call(post_plan(request)).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "optimal");
}

#[tokio::test]
async fn infeasible_plan_is_unprocessable() {
    let (status, body) = call(post_plan(small_network(500.0))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Infeasible");
    assert!(body["message"].as_str().unwrap().contains("total hub capacity"));
}

#[tokio::test]
async fn invalid_site_is_rejected() {
    let mut request = small_network(70.0);
    request["sources"][0]["Available Quantity (tonnes/year)"] = json!(-5.0);
    let (status, body) = call(post_plan(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn duplicate_reference_is_rejected() {
    let mut request = small_network(70.0);
    request["sources"][1]["reference"] = json!("S1");
    let (status, body) = call(post_plan(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("duplicate"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/plan")
        .header("content-type", "application/json")
        .body(Body::from("{\"sources\": 3}"))
        .unwrap();
    let (status, body) = call(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
async fn slow_plan_times_out_with_408() {
    let mut config = Config::default();
    config.server.request_timeout_secs = 0;
    let body = serde_json::to_value(PlanRequest::sample()).unwrap();

    let (status, body) = call_app(app_with(&config), post_plan(body)).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, Value::Null);
}
