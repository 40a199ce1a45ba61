use thiserror::Error;

use crate::optimizer::SolveStatus;

/// Errors raised by the planning pipeline (build, compile, solve, extract).
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Malformed or inconsistent input instance
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Solver reported the model as infeasible or unbounded
    #[error("Model is {status}: {context}")]
    InfeasibleModel { status: SolveStatus, context: String },

    /// The solving engine could not be invoked
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    /// The solver returned without a usable assignment
    #[error("Model not solved: {detail}")]
    NotSolved { detail: String },

    /// Derived ratio with a zero denominator
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// Extracted figures disagree with the objective or with the instance bounds
    #[error("Inconsistent solution: {0}")]
    InconsistentSolution(String),
}

impl PlanningError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlanningError::ValidationError(message.into())
    }

    /// Short machine-readable kind, used in API error bodies and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PlanningError::ValidationError(_) => "ValidationError",
            PlanningError::InfeasibleModel { .. } => "InfeasibleModel",
            PlanningError::SolverUnavailable(_) => "SolverUnavailable",
            PlanningError::NotSolved { .. } => "NotSolved",
            PlanningError::DivisionUndefined(_) => "DivisionUndefined",
            PlanningError::InconsistentSolution(_) => "InconsistentSolution",
        }
    }
}

impl From<validator::ValidationErrors> for PlanningError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PlanningError::ValidationError(errors.to_string())
    }
}
