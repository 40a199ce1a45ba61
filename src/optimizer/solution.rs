use ndarray::Array2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Closed set of solver outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

/// Variable values returned with an optimal solve
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// flows[[source, hub]] in tonnes of feedstock
    pub flows: Array2<f64>,
    /// Activation binary per hub, as reported by the solver
    pub activations: Vec<f64>,
    /// Objective value evaluated at the assignment
    pub objective_value: f64,
}

/// Status plus, when optimal, the assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    status: SolveStatus,
    assignment: Option<Assignment>,
    /// Engine message accompanying a non-optimal status
    detail: Option<String>,
}

impl Solution {
    pub fn optimal(assignment: Assignment) -> Self {
        Self {
            status: SolveStatus::Optimal,
            assignment: Some(assignment),
            detail: None,
        }
    }

    /// A non-optimal outcome; never carries an assignment
    pub fn unsolved(status: SolveStatus, detail: impl Into<String>) -> Self {
        debug_assert!(status != SolveStatus::Optimal);
        Self {
            status,
            assignment: None,
            detail: Some(detail.into()),
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
