use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the great-circle formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Great-circle (haversine) distance in kilometres between two lat/lon pairs.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` marginally outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Source of edge lengths used when an instance is built.
pub trait DistanceProvider: Send + Sync {
    fn distance_km(&self, from: &Coordinates, to: &Coordinates) -> f64;
}

/// Haversine distance on a spherical Earth
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceProvider for GreatCircle {
    fn distance_km(&self, from: &Coordinates, to: &Coordinates) -> f64 {
        distance(from.latitude, from.longitude, to.latitude, to.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: Coordinates = Coordinates {
        latitude: 51.5074,
        longitude: -0.1278,
    };
    const MANCHESTER: Coordinates = Coordinates {
        latitude: 53.4808,
        longitude: -2.2426,
    };

    #[test]
    fn test_distance_is_zero_for_same_point() {
        assert_eq!(GreatCircle.distance_km(&LONDON, &LONDON), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = GreatCircle.distance_km(&LONDON, &MANCHESTER);
        let back = GreatCircle.distance_km(&MANCHESTER, &LONDON);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_london_manchester_distance() {
        let km = GreatCircle.distance_km(&LONDON, &MANCHESTER);
        // Roughly 262 km as the crow flies
        assert!((km - 262.0).abs() < 3.0, "unexpected distance {km}");
    }

    #[test]
    fn test_antipodal_points() {
        let km = distance(0.0, 0.0, 0.0, 180.0);
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(LONDON.is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::NAN).is_valid());
    }
}
