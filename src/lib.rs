//! Feedstock hub planning: choose which candidate processing hubs to build
//! and how much feedstock to haul from each source to each hub so that a
//! minimum total output is met at least total cost.
//!
//! The pipeline is [`domain::InstanceBuilder`] → [`optimizer::compile`] →
//! [`optimizer::SolveInvoker`] → [`optimizer::extract`], wrapped end to end
//! by [`planner::Planner`].

pub mod api;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod optimizer;
pub mod planner;
pub mod telemetry;

pub use error::PlanningError;
pub use planner::Planner;
