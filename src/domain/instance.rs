//! Problem instance assembly.
//!
//! An [`Instance`] is the immutable input of one planning run: the source and
//! hub lists, the source x hub distance matrix and the cost parameters. It is
//! only obtainable through [`InstanceBuilder::build`], which validates every
//! record before any distance is computed.

use std::collections::HashSet;

use ndarray::Array2;
use tracing::debug;
use validator::Validate;

use super::distance::{Coordinates, DistanceProvider, GreatCircle};
use super::parameters::CostParameters;
use super::site::{Hub, Source};
use crate::error::PlanningError;

/// Site references must be unique within their collection
fn ensure_unique<'a>(
    kind: &str,
    references: impl Iterator<Item = &'a str>,
) -> Result<(), PlanningError> {
    let mut seen = HashSet::new();
    for reference in references {
        if !seen.insert(reference) {
            return Err(PlanningError::validation(format!(
                "duplicate {kind} reference '{reference}'"
            )));
        }
    }
    Ok(())
}

/// Validated, immutable planning input
#[derive(Debug, Clone)]
pub struct Instance {
    sources: Vec<Source>,
    hubs: Vec<Hub>,
    /// distances[[source, hub]] in km
    distances: Array2<f64>,
    parameters: CostParameters,
}

impl Instance {
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    pub fn parameters(&self) -> &CostParameters {
        &self.parameters
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    pub fn distance(&self, source: usize, hub: usize) -> f64 {
        self.distances[[source, hub]]
    }

    /// Σ available quantity over all sources (tonnes/year)
    pub fn total_supply(&self) -> f64 {
        self.sources.iter().map(|s| s.available_quantity).sum()
    }

    /// Σ max capacity over all hubs (tonnes of product/year)
    pub fn total_capacity(&self) -> f64 {
        self.hubs.iter().map(|h| h.max_capacity).sum()
    }

    /// Production cost per tonne of product at the given hub
    pub fn unit_production_cost(&self, hub: usize) -> f64 {
        self.parameters
            .unit_production_cost(self.hubs[hub].heat_cost_per_kwh)
    }

    /// Largest achievable total production: bounded by hub capacity and by
    /// the product obtainable from all supply.
    pub fn max_achievable_production(&self) -> f64 {
        self.total_capacity()
            .min(self.total_supply() * self.parameters.conversion_factor)
    }
}

/// Collects raw records and parameters, validates them and computes distances.
pub struct InstanceBuilder {
    sources: Vec<Source>,
    hubs: Vec<Hub>,
    parameters: CostParameters,
    distance: Box<dyn DistanceProvider>,
}

impl Default for InstanceBuilder {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            hubs: Vec::new(),
            parameters: CostParameters::default(),
            distance: Box::new(GreatCircle),
        }
    }
}

impl InstanceBuilder {
    pub fn sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn hubs(mut self, hubs: impl IntoIterator<Item = Hub>) -> Self {
        self.hubs.extend(hubs);
        self
    }

    pub fn hub(mut self, hub: Hub) -> Self {
        self.hubs.push(hub);
        self
    }

    pub fn parameters(mut self, parameters: CostParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Replace the great-circle metric, e.g. with road distances
    pub fn distance_provider(mut self, provider: impl DistanceProvider + 'static) -> Self {
        self.distance = Box::new(provider);
        self
    }

    pub fn build(self) -> Result<Instance, PlanningError> {
        self.validate()?;
        ensure_unique("source", self.sources.iter().map(|s| s.reference.as_str()))?;
        ensure_unique("hub", self.hubs.iter().map(|h| h.reference.as_str()))?;

        let distances = Array2::from_shape_fn((self.sources.len(), self.hubs.len()), |(i, j)| {
            self.distance
                .distance_km(&self.sources[i].location(), &self.hubs[j].location())
        });
        if let Some(bad) = distances.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(PlanningError::validation(format!(
                "distance provider returned an invalid distance: {bad}"
            )));
        }

        debug!(
            sources = self.sources.len(),
            hubs = self.hubs.len(),
            "instance built"
        );

        Ok(Instance {
            sources: self.sources,
            hubs: self.hubs,
            distances,
            parameters: self.parameters,
        })
    }

    fn validate(&self) -> Result<(), PlanningError> {
        if self.sources.is_empty() {
            return Err(PlanningError::validation("at least one source is required"));
        }
        if self.hubs.is_empty() {
            return Err(PlanningError::validation("at least one hub is required"));
        }

        // Range checks pass NaN through, so finiteness is checked explicitly
        for source in &self.sources {
            for (field, value) in source.numeric_fields() {
                ensure_finite(&format!("source '{}'", source.reference), field, value)?;
            }
            ensure_location(&format!("source '{}'", source.reference), source.location())?;
            source.validate().map_err(|e| {
                PlanningError::validation(format!("source '{}': {e}", source.reference))
            })?;
        }
        for hub in &self.hubs {
            for (field, value) in hub.numeric_fields() {
                ensure_finite(&format!("hub '{}'", hub.reference), field, value)?;
            }
            ensure_location(&format!("hub '{}'", hub.reference), hub.location())?;
            hub.validate()
                .map_err(|e| PlanningError::validation(format!("hub '{}': {e}", hub.reference)))?;
        }

        for (field, value) in self.parameters.numeric_fields() {
            ensure_finite("parameters", &field, value)?;
        }
        self.parameters.validate()?;
        for input in &self.parameters.auxiliary_inputs {
            input.validate()?;
        }

        Ok(())
    }
}

fn ensure_finite(owner: &str, field: &str, value: f64) -> Result<(), PlanningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PlanningError::validation(format!(
            "{owner}: {field} is not finite: {value}"
        )))
    }
}

fn ensure_location(owner: &str, location: Coordinates) -> Result<(), PlanningError> {
    if location.is_valid() {
        Ok(())
    } else {
        Err(PlanningError::validation(format!(
            "{owner}: coordinates ({}, {}) are out of range",
            location.latitude, location.longitude
        )))
    }
}
