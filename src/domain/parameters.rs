use serde::{Deserialize, Serialize};
use validator::Validate;

/// An auxiliary process input consumed per tonne of product (CO2, ammonia, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AuxiliaryInput {
    #[validate(length(min = 1, message = "auxiliary input name must not be empty"))]
    pub name: String,
    /// Tonnes of input required per tonne of product
    #[validate(range(min = 0.0))]
    pub requirement_per_tonne: f64,
    /// Currency per tonne of input
    #[validate(range(min = 0.0))]
    pub unit_cost: f64,
}

impl AuxiliaryInput {
    pub fn new(name: impl Into<String>, requirement_per_tonne: f64, unit_cost: f64) -> Self {
        Self {
            name: name.into(),
            requirement_per_tonne,
            unit_cost,
        }
    }

    /// Cost contributed per tonne of product
    pub fn cost_per_tonne(&self) -> f64 {
        self.requirement_per_tonne * self.unit_cost
    }
}

/// Scalar cost and process parameters shared by every hub and edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CostParameters {
    /// Minimum total converted output across all hubs (tonnes/year)
    #[validate(range(min = 0.0))]
    pub minimum_total_production: f64,
    /// Currency per tonne of feedstock per km hauled
    #[validate(range(min = 0.0))]
    pub haulage_cost_per_tonne_km: f64,
    /// Capital cost incurred by every activated hub
    #[validate(range(min = 0.0))]
    pub generic_capex: f64,
    /// Fraction of feedstock mass realised as product mass
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub conversion_factor: f64,
    /// kWh of heat per tonne of product
    #[validate(range(min = 0.0))]
    pub heat_required_per_tonne: f64,
    /// Optional per-tonne inputs; an empty list prices heat only
    pub auxiliary_inputs: Vec<AuxiliaryInput>,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            minimum_total_production: 120_000.0,
            haulage_cost_per_tonne_km: 0.02,
            generic_capex: 100_000.0,
            conversion_factor: 0.7,
            heat_required_per_tonne: 10.0,
            auxiliary_inputs: Vec::new(),
        }
    }
}

impl CostParameters {
    /// CO2 / ammonia / phosphorus / nitrogen requirements used by the
    /// fertiliser process variant that prices chemical inputs.
    pub fn fertiliser_inputs() -> Vec<AuxiliaryInput> {
        vec![
            AuxiliaryInput::new("co2", 0.2, 50.0),
            AuxiliaryInput::new("ammonia", 0.1, 100.0),
            AuxiliaryInput::new("phosphorus", 0.05, 80.0),
            AuxiliaryInput::new("nitrogen", 0.15, 70.0),
        ]
    }

    pub fn with_auxiliary_inputs(mut self, inputs: Vec<AuxiliaryInput>) -> Self {
        self.auxiliary_inputs = inputs;
        self
    }

    /// Sum of auxiliary input costs per tonne of product
    pub fn auxiliary_cost_per_tonne(&self) -> f64 {
        self.auxiliary_inputs.iter().map(AuxiliaryInput::cost_per_tonne).sum()
    }

    /// Production cost per tonne of product at a hub with the given heat price
    pub fn unit_production_cost(&self, heat_cost_per_kwh: f64) -> f64 {
        heat_cost_per_kwh * self.heat_required_per_tonne + self.auxiliary_cost_per_tonne()
    }

    pub(crate) fn numeric_fields(&self) -> Vec<(String, f64)> {
        let mut fields = vec![
            ("minimum_total_production".to_string(), self.minimum_total_production),
            ("haulage_cost_per_tonne_km".to_string(), self.haulage_cost_per_tonne_km),
            ("generic_capex".to_string(), self.generic_capex),
            ("conversion_factor".to_string(), self.conversion_factor),
            ("heat_required_per_tonne".to_string(), self.heat_required_per_tonne),
        ];
        for input in &self.auxiliary_inputs {
            fields.push((format!("{}.requirement_per_tonne", input.name), input.requirement_per_tonne));
            fields.push((format!("{}.unit_cost", input.name), input.unit_cost));
        }
        fields
    }
}
