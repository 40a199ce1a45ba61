use serde::{Deserialize, Serialize};
use validator::Validate;

use super::distance::Coordinates;

/// Feedstock supply site.
///
/// Serialized field names follow the tabular headers the datasets are
/// published with; snake_case aliases are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Source {
    #[serde(rename = "Site Reference", alias = "reference")]
    #[validate(length(min = 1, message = "site reference must not be empty"))]
    pub reference: String,

    /// Latitude (decimal degrees)
    #[serde(rename = "X Coordinates", alias = "latitude")]
    pub latitude: f64,

    /// Longitude (decimal degrees)
    #[serde(rename = "Y Coordinates", alias = "longitude")]
    pub longitude: f64,

    #[serde(rename = "Available Quantity (tonnes/year)", alias = "available_quantity")]
    #[validate(range(min = 0.0))]
    pub available_quantity: f64,

    #[serde(
        rename = "Water Content (%)",
        alias = "water_content_percent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0, max = 100.0))]
    pub water_content_percent: Option<f64>,

    /// Purchase price (currency/tonne). Carried with the site but not priced
    /// into the objective.
    #[serde(rename = "Purchase Price (£/tonne)", alias = "purchase_price", default)]
    #[validate(range(min = 0.0))]
    pub purchase_price: f64,
}

impl Source {
    pub fn new(reference: impl Into<String>, location: Coordinates, available_quantity: f64) -> Self {
        Self {
            reference: reference.into(),
            latitude: location.latitude,
            longitude: location.longitude,
            available_quantity,
            water_content_percent: None,
            purchase_price: 0.0,
        }
    }

    pub fn with_purchase_price(mut self, purchase_price: f64) -> Self {
        self.purchase_price = purchase_price;
        self
    }

    pub fn with_water_content(mut self, percent: f64) -> Self {
        self.water_content_percent = Some(percent);
        self
    }

    pub fn location(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub(crate) fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("available_quantity", self.available_quantity),
            ("water_content_percent", self.water_content_percent.unwrap_or(0.0)),
            ("purchase_price", self.purchase_price),
        ]
    }
}

/// Candidate processing hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Hub {
    #[serde(rename = "Site Reference", alias = "reference")]
    #[validate(length(min = 1, message = "site reference must not be empty"))]
    pub reference: String,

    #[serde(rename = "X Coordinates", alias = "latitude")]
    pub latitude: f64,

    #[serde(rename = "Y Coordinates", alias = "longitude")]
    pub longitude: f64,

    /// Heat the site can supply per year. Reported against, not constrained.
    #[serde(
        rename = "Heat Available (kWh/year)",
        alias = "heat_available_kwh",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0))]
    pub heat_available_kwh: Option<f64>,

    #[serde(rename = "Cost of Heat (£/kWh)", alias = "heat_cost_per_kwh")]
    #[validate(range(min = 0.0))]
    pub heat_cost_per_kwh: f64,

    /// Maximum converted output (tonnes/year)
    #[serde(rename = "Max Capacity (tonnes/year)", alias = "max_capacity")]
    #[validate(range(min = 0.0))]
    pub max_capacity: f64,
}

impl Hub {
    pub fn new(
        reference: impl Into<String>,
        location: Coordinates,
        heat_cost_per_kwh: f64,
        max_capacity: f64,
    ) -> Self {
        Self {
            reference: reference.into(),
            latitude: location.latitude,
            longitude: location.longitude,
            heat_available_kwh: None,
            heat_cost_per_kwh,
            max_capacity,
        }
    }

    pub fn with_heat_available(mut self, kwh: f64) -> Self {
        self.heat_available_kwh = Some(kwh);
        self
    }

    pub fn location(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub(crate) fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("heat_available_kwh", self.heat_available_kwh.unwrap_or(0.0)),
            ("heat_cost_per_kwh", self.heat_cost_per_kwh),
            ("max_capacity", self.max_capacity),
        ]
    }
}
