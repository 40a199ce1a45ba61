//! Tabular input and output: site CSVs in, transport CSV and JSON report out.

pub mod export;
pub mod sample;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::{Hub, Source};

pub use export::{format_summary, write_report_json, write_transport, write_transport_csv};

fn read_records<T: DeserializeOwned, R: Read>(reader: R, kind: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize()
        .enumerate()
        // header is line 1
        .map(|(row, record)| record.with_context(|| format!("reading {kind} record at line {}", row + 2)))
        .collect()
}

pub fn read_sources<R: Read>(reader: R) -> Result<Vec<Source>> {
    read_records(reader, "source")
}

pub fn read_hubs<R: Read>(reader: R) -> Result<Vec<Hub>> {
    read_records(reader, "hub")
}

pub fn load_sources(path: &Path) -> Result<Vec<Source>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening sources CSV: {}", path.display()))?;
    read_sources(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn load_hubs(path: &Path) -> Result<Vec<Hub>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening hubs CSV: {}", path.display()))?;
    read_hubs(file).with_context(|| format!("parsing {}", path.display()))
}

/// Loads both site lists, substituting the sample for any list without a path
pub fn load_network(sources: Option<&Path>, hubs: Option<&Path>) -> Result<(Vec<Source>, Vec<Hub>)> {
    let sources = match sources {
        Some(path) => load_sources(path)?,
        None => sample::sources(),
    };
    let hubs = match hubs {
        Some(path) => load_hubs(path)?,
        None => sample::hubs(),
    };
    info!(sources = sources.len(), hubs = hubs.len(), "network loaded");
    Ok((sources, hubs))
}
