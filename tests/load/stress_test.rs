#![cfg(test)]
//! Load tests for the planning service.
//!
//! - concurrent plans through one shared planner give identical answers
//! - the HTTP surface keeps answering health checks while plans run
//! - a short time limit degrades to `NotSolved` instead of hanging

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::task::JoinSet;
use tower::ServiceExt;

use feedstock_hub_optimizer::api::{self, AppState};
use feedstock_hub_optimizer::config::Config;
use feedstock_hub_optimizer::dataset::sample;
use feedstock_hub_optimizer::domain::Instance;
use feedstock_hub_optimizer::optimizer::{MicroLpEngine, SolveInvoker};
use feedstock_hub_optimizer::{Planner, PlanningError};

fn sample_instance() -> Instance {
    Instance::builder()
        .sources(sample::sources())
        .hubs(sample::hubs())
        .parameters(sample::parameters())
        .build()
        .expect("sample network is valid")
}

/// Test: concurrent plans on a shared planner
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Ignore by default as this is a slow test
async fn test_concurrent_plans_agree() {
    let planner = Arc::new(Planner::default());
    let instance = Arc::new(sample_instance());

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let planner = Arc::clone(&planner);
        let instance = Arc::clone(&instance);
        tasks.spawn(async move { planner.plan(&instance).await });
    }

    let mut totals = Vec::new();
    while let Some(result) = tasks.join_next().await {
        let report = result
            .expect("task should complete without panic")
            .expect("sample network should solve");
        totals.push(report.costs.total);
    }

    let first = totals[0];
    assert!(totals.iter().all(|t| (t - first).abs() <= 1e-6 * first));
}

/// Test: health checks stay fast while plans are running
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Ignore by default as this is a slow test
async fn test_health_latency_under_plan_load() {
    let app = api::router(AppState::new(Planner::default()), &Config::default());
    let body = serde_json::to_string(&api::plan::PlanRequest::sample()).unwrap();

    let mut plans = JoinSet::new();
    for _ in 0..4 {
        let app = app.clone();
        let body = body.clone();
        plans.spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/api/v1/plan")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        });
    }

    for _ in 0..20 {
        let start = Instant::now();
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let status = app.clone().oneshot(request).await.unwrap().status();
        let latency = start.elapsed();

        assert_eq!(status, StatusCode::OK);
        assert!(
            latency < Duration::from_millis(250),
            "health check took {:?} under load",
            latency
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    while let Some(status) = plans.join_next().await {
        assert_eq!(status.expect("plan request should not panic"), StatusCode::OK);
    }
}

/// Test: an impossible time limit yields NotSolved promptly
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore] // Ignore by default as this is a slow test
async fn test_time_limit_under_load() {
    let planner = Planner::new(
        SolveInvoker::new(Arc::new(MicroLpEngine), Duration::from_millis(1)),
        Default::default(),
    );

    let start = Instant::now();
    let err = planner.plan(&sample_instance()).await.unwrap_err();

    assert!(matches!(err, PlanningError::NotSolved { .. }), "{err:?}");
    assert!(start.elapsed() < Duration::from_secs(1));
}

/// Benchmark: sample plans per second on the blocking path
#[test]
#[ignore] // Ignore by default as this is a slow test
fn test_throughput_benchmark() {
    let planner = Planner::default();
    let instance = sample_instance();

    let start = Instant::now();
    let mut runs = 0u32;
    while start.elapsed() < Duration::from_secs(5) || runs == 0 {
        planner.plan_blocking(&instance).expect("sample network should solve");
        runs += 1;
    }

    let elapsed = start.elapsed();
    println!(
        "Throughput: {:.2} plans/second ({} plans in {:?})",
        runs as f64 / elapsed.as_secs_f64(),
        runs,
        elapsed
    );
}
