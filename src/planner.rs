use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::domain::Instance;
use crate::error::PlanningError;
use crate::optimizer::{compile, extract, ActivationBound, PlanReport, SolveInvoker, SolverEngine};

/// Compile, solve and extract in one call.
#[derive(Clone, Default)]
pub struct Planner {
    invoker: SolveInvoker,
    activation_bound: ActivationBound,
}

impl Planner {
    pub fn new(invoker: SolveInvoker, activation_bound: ActivationBound) -> Self {
        Self {
            invoker,
            activation_bound,
        }
    }

    pub fn with_engine(engine: Arc<dyn SolverEngine>, time_limit: Duration) -> Self {
        Self::new(SolveInvoker::new(engine, time_limit), ActivationBound::default())
    }

    pub fn activation_bound(&self) -> ActivationBound {
        self.activation_bound
    }

    /// Same planner with a different big-M rule
    pub fn with_activation_bound(&self, activation_bound: ActivationBound) -> Self {
        Self {
            invoker: self.invoker.clone(),
            activation_bound,
        }
    }

    pub fn invoker(&self) -> &SolveInvoker {
        &self.invoker
    }

    /// Solves on the calling thread with no time limit
    #[instrument(skip_all, fields(sources = instance.sources().len(), hubs = instance.hubs().len()))]
    pub fn plan_blocking(&self, instance: &Instance) -> Result<PlanReport, PlanningError> {
        let model = compile(instance, self.activation_bound);
        let solution = self.invoker.invoke(model)?;
        extract(instance, &solution)
    }

    /// Solves on the blocking pool under the invoker's time limit
    #[instrument(skip_all, fields(sources = instance.sources().len(), hubs = instance.hubs().len()))]
    pub async fn plan(&self, instance: &Instance) -> Result<PlanReport, PlanningError> {
        let model = compile(instance, self.activation_bound);
        info!(
            engine = self.invoker.engine_name(),
            constraints = model.num_constraints(),
            "submitting model"
        );
        let solution = self.invoker.invoke_with_timeout(model).await?;
        extract(instance, &solution)
    }
}
