//! Solve invocation.
//!
//! The numeric engine is a black box behind [`SolverEngine`]: it takes a
//! compiled [`Model`] and returns a [`Solution`] whose status is one of the
//! closed [`SolveStatus`] values. [`SolveInvoker`] wraps an engine with the
//! blocking and the timed (off-thread) call paths.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use good_lp::solvers::microlp::microlp;
use good_lp::{ResolutionError, Solution as _, SolverModel};
use tracing::{info, warn};

use super::model::{Model, ModelParts};
use super::solution::{Assignment, Solution, SolveStatus};
use crate::error::PlanningError;

/// A MILP backend. `Err` is reserved for engines that cannot be invoked at
/// all; every outcome of an actual solve is reported through the status.
#[cfg_attr(test, mockall::automock)]
pub trait SolverEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, model: Model) -> Result<Solution, PlanningError>;
}

/// Pure-Rust branch-and-bound engine (microlp via good_lp)
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpEngine;

impl SolverEngine for MicroLpEngine {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: Model) -> Result<Solution, PlanningError> {
        let ModelParts {
            variables,
            objective,
            constraints,
            flows,
            activations,
        } = model.into_parts();

        let mut problem = variables.minimise(objective.clone()).using(microlp);
        for named in constraints {
            problem = problem.with(named.constraint);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || problem.solve()))
            .map_err(|payload| PlanningError::SolverUnavailable(panic_message(payload)))?;

        Ok(match outcome {
            Ok(solution) => Solution::optimal(Assignment {
                flows: flows.mapv(|flow| solution.value(flow)),
                activations: activations.iter().map(|&a| solution.value(a)).collect(),
                objective_value: objective.eval_with(&solution),
            }),
            Err(ResolutionError::Infeasible) => {
                Solution::unsolved(SolveStatus::Infeasible, "solver reported infeasible")
            }
            Err(ResolutionError::Unbounded) => {
                Solution::unsolved(SolveStatus::Unbounded, "solver reported unbounded")
            }
            Err(other) => Solution::unsolved(SolveStatus::NotSolved, other.to_string()),
        })
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("solver engine panicked: {message}")
}

/// Submits models to an engine, blocking or with a whole-call time limit.
#[derive(Clone)]
pub struct SolveInvoker {
    engine: Arc<dyn SolverEngine>,
    time_limit: Duration,
}

impl Default for SolveInvoker {
    fn default() -> Self {
        Self::new(Arc::new(MicroLpEngine), Duration::from_secs(60))
    }
}

impl SolveInvoker {
    pub fn new(engine: Arc<dyn SolverEngine>, time_limit: Duration) -> Self {
        Self { engine, time_limit }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Single-shot blocking solve on the calling thread.
    pub fn invoke(&self, model: Model) -> Result<Solution, PlanningError> {
        let started = Instant::now();
        let solution = self.engine.solve(model)?;
        log_outcome(self.engine.name(), &solution, started);
        Ok(solution)
    }

    /// Runs the solve on the blocking pool. If the time limit elapses first
    /// the call returns `NotSolved`; the engine thread is left to finish on
    /// its own since the engines offer no cancellation hook.
    pub async fn invoke_with_timeout(&self, model: Model) -> Result<Solution, PlanningError> {
        let started = Instant::now();
        let engine = Arc::clone(&self.engine);
        let handle = tokio::task::spawn_blocking(move || engine.solve(model));

        let solution = match tokio::time::timeout(self.time_limit, handle).await {
            Err(_) => {
                warn!(
                    engine = self.engine.name(),
                    limit_secs = self.time_limit.as_secs_f64(),
                    "solver time limit exceeded"
                );
                Solution::unsolved(
                    SolveStatus::NotSolved,
                    format!(
                        "time limit of {:.1}s exceeded",
                        self.time_limit.as_secs_f64()
                    ),
                )
            }
            Ok(Err(join_error)) => {
                return Err(PlanningError::SolverUnavailable(format!(
                    "solver task failed: {join_error}"
                )))
            }
            Ok(Ok(result)) => result?,
        };

        log_outcome(self.engine.name(), &solution, started);
        Ok(solution)
    }
}

fn log_outcome(engine: &str, solution: &Solution, started: Instant) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match solution.assignment() {
        Some(assignment) => info!(
            engine,
            status = %solution.status(),
            objective = assignment.objective_value,
            elapsed_ms,
            "solve finished"
        ),
        None => warn!(
            engine,
            status = %solution.status(),
            detail = solution.detail().unwrap_or_default(),
            elapsed_ms,
            "solve finished without an optimal assignment"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, CostParameters, Hub, Instance, Source};
    use crate::optimizer::model::{compile, ActivationBound};

    fn model(minimum_total_production: f64) -> Model {
        let instance = Instance::builder()
            .sources([
                Source::new("S1", Coordinates::new(52.0, -1.0), 100.0),
                Source::new("S2", Coordinates::new(52.0, -1.0), 50.0),
            ])
            .hub(Hub::new("H1", Coordinates::new(52.0, -1.0), 0.05, 200.0))
            .parameters(CostParameters {
                minimum_total_production,
                conversion_factor: 0.7,
                heat_required_per_tonne: 1.0,
                generic_capex: 1000.0,
                haulage_cost_per_tonne_km: 0.01,
                auxiliary_inputs: vec![],
            })
            .build()
            .unwrap();
        compile(&instance, ActivationBound::TotalSupply)
    }

    #[test]
    fn test_microlp_solves_small_instance() {
        let solution = SolveInvoker::default().invoke(model(70.0)).unwrap();
        assert_eq!(solution.status(), SolveStatus::Optimal);

        let assignment = solution.assignment().unwrap();
        assert_eq!(assignment.flows.dim(), (2, 1));
        assert!((assignment.activations[0] - 1.0).abs() < 1e-6);
        assert!(assignment.flows.sum() >= 100.0 - 1e-6);
    }

    #[test]
    fn test_microlp_reports_infeasible() {
        // 150 t of feedstock can yield at most 105 t of product
        let solution = SolveInvoker::default().invoke(model(500.0)).unwrap();
        assert_eq!(solution.status(), SolveStatus::Infeasible);
        assert!(solution.assignment().is_none());
    }

    #[test]
    fn test_engine_error_is_propagated() {
        let mut engine = MockSolverEngine::new();
        engine.expect_name().return_const("mock");
        engine
            .expect_solve()
            .times(1)
            .returning(|_| Err(PlanningError::SolverUnavailable("license missing".into())));

        let invoker = SolveInvoker::new(Arc::new(engine), Duration::from_secs(1));
        let err = invoker.invoke(model(70.0)).unwrap_err();
        assert!(matches!(err, PlanningError::SolverUnavailable(_)));
    }

    #[test]
    fn test_status_is_passed_through_verbatim() {
        let mut engine = MockSolverEngine::new();
        engine.expect_name().return_const("mock");
        engine
            .expect_solve()
            .returning(|_| Ok(Solution::unsolved(SolveStatus::Unbounded, "ray found")));

        let invoker = SolveInvoker::new(Arc::new(engine), Duration::from_secs(1));
        let solution = invoker.invoke(model(70.0)).unwrap();
        assert_eq!(solution.status(), SolveStatus::Unbounded);
        assert_eq!(solution.detail(), Some("ray found"));
    }

    #[tokio::test]
    async fn test_timeout_yields_not_solved() {
        let mut engine = MockSolverEngine::new();
        engine.expect_name().return_const("slow");
        engine.expect_solve().returning(|_| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Solution::unsolved(SolveStatus::Infeasible, "late"))
        });

        let invoker = SolveInvoker::new(Arc::new(engine), Duration::from_millis(20));
        let solution = invoker.invoke_with_timeout(model(70.0)).await.unwrap();
        assert_eq!(solution.status(), SolveStatus::NotSolved);
        assert!(solution.detail().unwrap().contains("time limit"));
    }

    #[tokio::test]
    async fn test_panicking_engine_is_unavailable() {
        let mut engine = MockSolverEngine::new();
        engine.expect_name().return_const("broken");
        engine.expect_solve().returning(|_| panic!("segfault avoided"));

        let invoker = SolveInvoker::new(Arc::new(engine), Duration::from_secs(5));
        let err = invoker.invoke_with_timeout(model(70.0)).await.unwrap_err();
        assert!(matches!(err, PlanningError::SolverUnavailable(_)));
    }

    #[tokio::test]
    async fn test_timed_solve_with_microlp() {
        let invoker = SolveInvoker::new(Arc::new(MicroLpEngine), Duration::from_secs(30));
        let solution = invoker.invoke_with_timeout(model(70.0)).await.unwrap();
        assert!(solution.is_optimal());
    }
}
