//! Facility-location-with-flow MILP formulation.
//!
//! Variables:
//! - `flow[i][j] >= 0`: tonnes of feedstock shipped from source `i` to hub `j`
//! - `active[j] ∈ {0, 1}`: hub `j` is built (capital cost incurred)
//!
//! Objective (minimise):
//! - transportation: Σ flow[i][j] * distance[i][j] * haulage
//! - production: Σ_j (Σ_i flow[i][j]) * conversion * unit_cost[j]
//! - capital: Σ_j active[j] * capex
//!
//! Constraints, one named row per entity:
//! - `supply_<source>`: Σ_j flow[i][j] <= available[i]
//! - `capacity_<hub>`: (Σ_i flow[i][j]) * conversion <= max_capacity[j]
//! - `activation_<hub>`: Σ_i flow[i][j] <= active[j] * M[j]
//! - `min_total_production`: Σ_j (Σ_i flow[i][j]) * conversion >= minimum

use std::fmt;

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use itertools::iproduct;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::domain::Instance;

/// How the big-M of each activation row is chosen
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivationBound {
    /// M = Σ of every source's available quantity
    #[default]
    TotalSupply,
    /// M = min(Σ availability, hub capacity / conversion factor)
    HubCapacity,
}

impl ActivationBound {
    pub fn big_m(&self, instance: &Instance, hub: usize) -> f64 {
        let total_supply = instance.total_supply();
        match self {
            ActivationBound::TotalSupply => total_supply,
            ActivationBound::HubCapacity => {
                let inflow_limit =
                    instance.hubs()[hub].max_capacity / instance.parameters().conversion_factor;
                inflow_limit.min(total_supply)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintFamily {
    Supply,
    Capacity,
    Activation,
    MinimumProduction,
}

pub struct NamedConstraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub constraint: Constraint,
}

/// Everything an engine needs to solve the program and map values back.
pub struct ModelParts {
    pub variables: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<NamedConstraint>,
    /// flows[[source, hub]]
    pub flows: Array2<Variable>,
    pub activations: Vec<Variable>,
}

/// Compiled program, consumed by a solver engine. Nothing is evaluated here.
pub struct Model {
    parts: ModelParts,
}

impl Model {
    pub fn num_flow_variables(&self) -> usize {
        self.parts.flows.len()
    }

    pub fn num_activation_variables(&self) -> usize {
        self.parts.activations.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.parts.constraints.len()
    }

    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.parts.constraints.iter().map(|c| c.name.as_str())
    }

    pub fn count_family(&self, family: ConstraintFamily) -> usize {
        self.parts
            .constraints
            .iter()
            .filter(|c| c.family == family)
            .count()
    }

    pub fn into_parts(self) -> ModelParts {
        self.parts
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("flow_variables", &self.num_flow_variables())
            .field("activation_variables", &self.num_activation_variables())
            .field("constraints", &self.num_constraints())
            .finish()
    }
}

/// Builds the program for `instance`. Deterministic: same instance, same
/// variable order and constraint order.
pub fn compile(instance: &Instance, bound: ActivationBound) -> Model {
    let params = instance.parameters();
    let sources = instance.sources();
    let hubs = instance.hubs();
    let conversion = params.conversion_factor;

    let mut variables = ProblemVariables::new();

    let flows = Array2::from_shape_fn((sources.len(), hubs.len()), |(i, j)| {
        variables.add(
            variable()
                .min(0.0)
                .name(format!("flow_{}_{}", sources[i].reference, hubs[j].reference)),
        )
    });
    let activations: Vec<Variable> = hubs
        .iter()
        .map(|hub| variables.add(variable().binary().name(format!("active_{}", hub.reference))))
        .collect();

    let inflows: Vec<Expression> = (0..hubs.len())
        .map(|j| {
            flows
                .column(j)
                .iter()
                .fold(Expression::from(0.0), |acc, &flow| acc + flow)
        })
        .collect();

    let mut transportation = Expression::from(0.0);
    for (i, j) in iproduct!(0..sources.len(), 0..hubs.len()) {
        transportation += instance.distance(i, j) * params.haulage_cost_per_tonne_km * flows[[i, j]];
    }

    let mut production = Expression::from(0.0);
    let mut capital = Expression::from(0.0);
    for (j, inflow) in inflows.iter().enumerate() {
        production += inflow.clone() * (conversion * instance.unit_production_cost(j));
        capital += params.generic_capex * activations[j];
    }

    let objective = transportation + production + capital;

    let mut constraints = Vec::with_capacity(sources.len() + 3 * hubs.len() + 1);

    for (i, source) in sources.iter().enumerate() {
        let outflow = flows
            .row(i)
            .iter()
            .fold(Expression::from(0.0), |acc, &flow| acc + flow);
        constraints.push(NamedConstraint {
            name: format!("supply_{}", source.reference),
            family: ConstraintFamily::Supply,
            constraint: constraint!(outflow <= source.available_quantity),
        });
    }

    for (j, hub) in hubs.iter().enumerate() {
        constraints.push(NamedConstraint {
            name: format!("capacity_{}", hub.reference),
            family: ConstraintFamily::Capacity,
            constraint: constraint!(inflows[j].clone() * conversion <= hub.max_capacity),
        });
    }

    for (j, hub) in hubs.iter().enumerate() {
        let big_m = bound.big_m(instance, j);
        constraints.push(NamedConstraint {
            name: format!("activation_{}", hub.reference),
            family: ConstraintFamily::Activation,
            constraint: constraint!(inflows[j].clone() <= big_m * activations[j]),
        });
    }

    let total_production = inflows
        .iter()
        .fold(Expression::from(0.0), |acc, inflow| acc + inflow.clone())
        * conversion;
    constraints.push(NamedConstraint {
        name: "min_total_production".to_string(),
        family: ConstraintFamily::MinimumProduction,
        constraint: constraint!(total_production >= params.minimum_total_production),
    });

    debug!(
        flow_variables = flows.len(),
        activation_variables = activations.len(),
        constraints = constraints.len(),
        activation_bound = %bound,
        "model compiled"
    );

    Model {
        parts: ModelParts {
            variables,
            objective,
            constraints,
            flows,
            activations,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, CostParameters, Hub, Source};

    fn instance() -> Instance {
        Instance::builder()
            .sources([
                Source::new("S1", Coordinates::new(52.0, -1.0), 100.0),
                Source::new("S2", Coordinates::new(52.5, -1.5), 50.0),
                Source::new("S3", Coordinates::new(53.0, -2.0), 25.0),
            ])
            .hubs([
                Hub::new("H1", Coordinates::new(52.2, -1.2), 0.05, 200.0),
                Hub::new("H2", Coordinates::new(53.1, -2.1), 0.04, 35.0),
            ])
            .parameters(CostParameters {
                minimum_total_production: 70.0,
                conversion_factor: 0.7,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_variable_counts() {
        let model = compile(&instance(), ActivationBound::TotalSupply);
        assert_eq!(model.num_flow_variables(), 6);
        assert_eq!(model.num_activation_variables(), 2);
    }

    #[test]
    fn test_one_constraint_per_entity() {
        let model = compile(&instance(), ActivationBound::TotalSupply);
        assert_eq!(model.count_family(ConstraintFamily::Supply), 3);
        assert_eq!(model.count_family(ConstraintFamily::Capacity), 2);
        assert_eq!(model.count_family(ConstraintFamily::Activation), 2);
        assert_eq!(model.count_family(ConstraintFamily::MinimumProduction), 1);
        assert_eq!(model.num_constraints(), 8);
    }

    #[test]
    fn test_constraint_names_are_traceable() {
        let model = compile(&instance(), ActivationBound::TotalSupply);
        let names: Vec<&str> = model.constraint_names().collect();
        assert_eq!(
            names,
            vec![
                "supply_S1",
                "supply_S2",
                "supply_S3",
                "capacity_H1",
                "capacity_H2",
                "activation_H1",
                "activation_H2",
                "min_total_production",
            ]
        );
    }

    #[test]
    fn test_big_m_total_supply() {
        let instance = instance();
        assert_eq!(ActivationBound::TotalSupply.big_m(&instance, 0), 175.0);
        assert_eq!(ActivationBound::TotalSupply.big_m(&instance, 1), 175.0);
    }

    #[test]
    fn test_big_m_hub_capacity_is_tighter() {
        let instance = instance();
        // 35 / 0.7 = 50 < 175
        assert!((ActivationBound::HubCapacity.big_m(&instance, 1) - 50.0).abs() < 1e-9);
        // 200 / 0.7 > 175, capped at total supply
        assert_eq!(ActivationBound::HubCapacity.big_m(&instance, 0), 175.0);
    }

    #[test]
    fn test_activation_bound_parses_from_config_strings() {
        use std::str::FromStr;
        assert_eq!(
            ActivationBound::from_str("hub_capacity").unwrap(),
            ActivationBound::HubCapacity
        );
        assert_eq!(ActivationBound::default(), ActivationBound::TotalSupply);
    }
}
