//! Built-in sample network: ten candidate hubs and ten feedstock sources
//! across Great Britain.

use crate::domain::{Coordinates, CostParameters, Hub, Source};

/// (reference, latitude, longitude, heat available, heat cost, capacity)
const HUBS: [(&str, f64, f64, f64, f64, f64); 10] = [
    ("Hub01", 51.5074, -0.1278, 500_000.0, 0.05, 10_000.0),
    ("Hub02", 53.4808, -2.2426, 750_000.0, 0.04, 15_000.0),
    ("Hub03", 55.9533, -3.1883, 600_000.0, 0.06, 12_000.0),
    ("Hub04", 52.4862, -1.8904, 450_000.0, 0.05, 9_000.0),
    ("Hub05", 53.4084, -2.9916, 800_000.0, 0.04, 16_000.0),
    ("Hub06", 52.6309, 1.2974, 700_000.0, 0.06, 14_000.0),
    ("Hub07", 54.9783, -1.6174, 650_000.0, 0.07, 13_000.0),
    ("Hub08", 53.8008, -1.5491, 550_000.0, 0.05, 11_000.0),
    ("Hub09", 50.3755, -4.1427, 720_000.0, 0.04, 15_000.0),
    ("Hub10", 55.8642, -4.2518, 600_000.0, 0.06, 12_000.0),
];

/// (reference, latitude, longitude, available, water %, purchase price)
const SOURCES: [(&str, f64, f64, f64, f64, f64); 10] = [
    ("FS01", 52.2053, 0.1218, 20_000.0, 30.0, 45.0),
    ("FS02", 51.5095, -0.0959, 25_000.0, 25.0, 50.0),
    ("FS03", 53.7893, -2.2425, 18_000.0, 28.0, 42.0),
    ("FS04", 51.4543, -2.5879, 30_000.0, 22.0, 48.0),
    ("FS05", 50.8225, -0.1373, 15_000.0, 35.0, 40.0),
    ("FS06", 51.4816, -0.4725, 22_000.0, 32.0, 47.0),
    ("FS07", 53.7632, -2.7034, 28_000.0, 27.0, 44.0),
    ("FS08", 52.4862, -1.8904, 27_000.0, 29.0, 49.0),
    ("FS09", 50.7192, -1.8808, 23_000.0, 31.0, 41.0),
    ("FS10", 55.3781, -3.4360, 21_000.0, 26.0, 46.0),
];

pub fn hubs() -> Vec<Hub> {
    HUBS.iter()
        .map(|&(reference, lat, lon, heat, heat_cost, capacity)| {
            Hub::new(reference, Coordinates::new(lat, lon), heat_cost, capacity)
                .with_heat_available(heat)
        })
        .collect()
}

pub fn sources() -> Vec<Source> {
    SOURCES
        .iter()
        .map(|&(reference, lat, lon, available, water, price)| {
            Source::new(reference, Coordinates::new(lat, lon), available)
                .with_water_content(water)
                .with_purchase_price(price)
        })
        .collect()
}

pub fn parameters() -> CostParameters {
    CostParameters::default()
}
