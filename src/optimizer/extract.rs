//! Result extraction.
//!
//! Walks an optimal assignment, recomputes every reported figure from the
//! instance data and re-checks it against the instance bounds and the
//! solver's objective before handing out a [`PlanReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::diagnostics::explain_infeasibility;
use super::solution::{Assignment, Solution, SolveStatus};
use crate::domain::Instance;
use crate::error::PlanningError;

/// Flows at or below this many tonnes are treated as zero when reporting
pub const FLOW_TOLERANCE: f64 = 1e-6;
/// Relative tolerance for bound re-checks and objective consistency
pub const RELATIVE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub transportation: f64,
    pub production: f64,
    pub capital: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubProduction {
    pub hub: String,
    pub active: bool,
    /// Feedstock received (tonnes/year)
    pub inbound_tonnes: f64,
    /// Converted output (tonnes/year)
    pub production_tonnes: f64,
    pub max_capacity_tonnes: f64,
    /// production / capacity, 0 for a zero-capacity hub
    pub utilisation: f64,
    pub heat_used_kwh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_available_kwh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUtilisation {
    pub source: String,
    pub available_tonnes: f64,
    pub shipped_tonnes: f64,
}

/// A strictly positive source -> hub shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub source: String,
    pub hub: String,
    pub tonnes: f64,
    pub distance_km: f64,
}

/// Everything reporting and export consumers need from an optimal run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub status: SolveStatus,
    pub objective_value: f64,
    pub costs: CostBreakdown,
    pub total_production_tonnes: f64,
    /// `None` when nothing is produced
    pub cost_per_tonne: Option<f64>,
    pub hubs: Vec<HubProduction>,
    pub sources: Vec<SourceUtilisation>,
    pub flows: Vec<FlowRecord>,
}

impl PlanReport {
    /// Total cost per tonne of product
    pub fn cost_per_tonne(&self) -> Result<f64, PlanningError> {
        cost_per_tonne(self.costs.total, self.total_production_tonnes)
    }

    pub fn hub(&self, reference: &str) -> Option<&HubProduction> {
        self.hubs.iter().find(|h| h.hub == reference)
    }

    pub fn active_hubs(&self) -> impl Iterator<Item = &HubProduction> {
        self.hubs.iter().filter(|h| h.active)
    }

    pub fn total_inbound_tonnes(&self) -> f64 {
        self.hubs.iter().map(|h| h.inbound_tonnes).sum()
    }
}

pub fn cost_per_tonne(total_cost: f64, total_production: f64) -> Result<f64, PlanningError> {
    if total_production <= 0.0 {
        return Err(PlanningError::DivisionUndefined(format!(
            "cost per tonne with total production {total_production} t"
        )));
    }
    Ok(total_cost / total_production)
}

fn within(value: f64, limit: f64) -> bool {
    value <= limit + RELATIVE_TOLERANCE * limit.abs().max(1.0)
}

/// Builds the report for an optimal solution. Any other status is refused
/// with the matching error and no figures.
pub fn extract(instance: &Instance, solution: &Solution) -> Result<PlanReport, PlanningError> {
    let assignment = match (solution.status(), solution.assignment()) {
        (SolveStatus::Optimal, Some(assignment)) => assignment,
        (SolveStatus::Optimal, None) => {
            return Err(PlanningError::InconsistentSolution(
                "optimal status without an assignment".to_string(),
            ))
        }
        (status @ (SolveStatus::Infeasible | SolveStatus::Unbounded), _) => {
            let context = match status {
                SolveStatus::Infeasible => explain_infeasibility(instance),
                _ => solution.detail().unwrap_or("objective is unbounded").to_string(),
            };
            return Err(PlanningError::InfeasibleModel { status, context });
        }
        (SolveStatus::NotSolved, _) => {
            return Err(PlanningError::NotSolved {
                detail: solution.detail().unwrap_or("no detail").to_string(),
            })
        }
    };

    check_dimensions(instance, assignment)?;

    let params = instance.parameters();
    let conversion = params.conversion_factor;
    let flows = assignment.flows.mapv(|f| f.max(0.0));

    let mut transportation = 0.0;
    let mut flow_records = Vec::new();
    for ((i, j), &tonnes) in flows.indexed_iter() {
        transportation += tonnes * instance.distance(i, j) * params.haulage_cost_per_tonne_km;
        if tonnes > FLOW_TOLERANCE {
            flow_records.push(FlowRecord {
                source: instance.sources()[i].reference.clone(),
                hub: instance.hubs()[j].reference.clone(),
                tonnes,
                distance_km: instance.distance(i, j),
            });
        }
    }

    let mut production_cost = 0.0;
    let mut capital = 0.0;
    let mut hubs = Vec::with_capacity(instance.hubs().len());
    for (j, hub) in instance.hubs().iter().enumerate() {
        let inbound: f64 = flows.column(j).sum();
        let produced = inbound * conversion;
        let activation = assignment.activations[j].clamp(0.0, 1.0);
        let active = activation > 0.5;

        if !within(produced, hub.max_capacity) {
            return Err(PlanningError::InconsistentSolution(format!(
                "hub '{}' produces {produced:.6} t above its capacity {} t",
                hub.reference, hub.max_capacity
            )));
        }
        if inbound > FLOW_TOLERANCE && !active {
            return Err(PlanningError::InconsistentSolution(format!(
                "hub '{}' receives {inbound:.6} t while inactive",
                hub.reference
            )));
        }

        production_cost += produced * instance.unit_production_cost(j);
        capital += activation * params.generic_capex;

        hubs.push(HubProduction {
            hub: hub.reference.clone(),
            active,
            inbound_tonnes: inbound,
            production_tonnes: produced,
            max_capacity_tonnes: hub.max_capacity,
            utilisation: if hub.max_capacity > 0.0 {
                produced / hub.max_capacity
            } else {
                0.0
            },
            heat_used_kwh: produced * params.heat_required_per_tonne,
            heat_available_kwh: hub.heat_available_kwh,
        });
    }

    let mut sources = Vec::with_capacity(instance.sources().len());
    for (i, source) in instance.sources().iter().enumerate() {
        let shipped: f64 = flows.row(i).sum();
        if !within(shipped, source.available_quantity) {
            return Err(PlanningError::InconsistentSolution(format!(
                "source '{}' ships {shipped:.6} t above its availability {} t",
                source.reference, source.available_quantity
            )));
        }
        sources.push(SourceUtilisation {
            source: source.reference.clone(),
            available_tonnes: source.available_quantity,
            shipped_tonnes: shipped,
        });
    }

    let total_production: f64 = hubs.iter().map(|h| h.production_tonnes).sum();
    if !within(params.minimum_total_production, total_production) {
        return Err(PlanningError::InconsistentSolution(format!(
            "total production {total_production:.6} t is below the minimum {} t",
            params.minimum_total_production
        )));
    }

    let total = transportation + production_cost + capital;
    let objective = assignment.objective_value;
    if (total - objective).abs() > RELATIVE_TOLERANCE * objective.abs().max(1.0) {
        return Err(PlanningError::InconsistentSolution(format!(
            "cost breakdown {total:.6} does not match objective {objective:.6}"
        )));
    }

    let report = PlanReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        status: SolveStatus::Optimal,
        objective_value: objective,
        costs: CostBreakdown {
            transportation,
            production: production_cost,
            capital,
            total,
        },
        total_production_tonnes: total_production,
        cost_per_tonne: cost_per_tonne(total, total_production).ok(),
        hubs,
        sources,
        flows: flow_records,
    };

    info!(
        run_id = %report.run_id,
        total_cost = total,
        production_tonnes = total_production,
        active_hubs = report.active_hubs().count(),
        positive_flows = report.flows.len(),
        "plan extracted"
    );

    Ok(report)
}

fn check_dimensions(instance: &Instance, assignment: &Assignment) -> Result<(), PlanningError> {
    let expected = (instance.sources().len(), instance.hubs().len());
    if assignment.flows.dim() != expected || assignment.activations.len() != expected.1 {
        return Err(PlanningError::InconsistentSolution(format!(
            "assignment shape {:?}/{} does not match instance {:?}",
            assignment.flows.dim(),
            assignment.activations.len(),
            expected
        )));
    }
    if let Some(bad) = assignment
        .flows
        .iter()
        .chain(assignment.activations.iter())
        .find(|v| !v.is_finite())
    {
        return Err(PlanningError::InconsistentSolution(format!(
            "assignment contains a non-finite value: {bad}"
        )));
    }
    Ok(())
}
