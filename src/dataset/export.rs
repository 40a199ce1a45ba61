use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::optimizer::PlanReport;

pub const TRANSPORT_HEADER: [&str; 3] = ["Source", "Hub", "Amount Transported (tonnes)"];

/// Writes every positive flow as one CSV row
pub fn write_transport<W: Write>(report: &PlanReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TRANSPORT_HEADER)
        .context("writing CSV header")?;

    for flow in &report.flows {
        wtr.write_record([flow.source.as_str(), flow.hub.as_str(), &flow.tonnes.to_string()])
            .context("writing CSV record")?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

pub fn write_transport_csv(report: &PlanReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating transport CSV: {}", path.display()))?;
    write_transport(report, file)
}

pub fn write_report_json(report: &PlanReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing plan report")?;
    std::fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}

/// Human-readable run summary for the CLI
pub fn format_summary(report: &PlanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status: {}", report.status);
    let _ = writeln!(out);
    let _ = writeln!(out, "Total transportation cost: £{:.2}", report.costs.transportation);
    let _ = writeln!(out, "Total production cost: £{:.2}", report.costs.production);
    let _ = writeln!(out, "Total CAPEX: £{:.2}", report.costs.capital);
    let _ = writeln!(out, "Total cost: £{:.2}", report.costs.total);
    let _ = writeln!(
        out,
        "Total production quantity: {:.2} tonnes",
        report.total_production_tonnes
    );
    match report.cost_per_tonne {
        Some(value) => {
            let _ = writeln!(out, "Cost per tonne produced: £{value:.2}");
        }
        None => {
            let _ = writeln!(out, "Cost per tonne produced: undefined (no production)");
        }
    }

    let _ = writeln!(out, "\nProduction at each hub:");
    for hub in &report.hubs {
        let _ = writeln!(
            out,
            "  {:<8} {:>12.2} t / {:>10.0} t ({:>5.1}%){}",
            hub.hub,
            hub.production_tonnes,
            hub.max_capacity_tonnes,
            hub.utilisation * 100.0,
            if hub.active { "" } else { "  inactive" }
        );
    }

    let _ = writeln!(out, "\nFeedstock transported:");
    for flow in &report.flows {
        let _ = writeln!(
            out,
            "  {} -> {}: {:.2} tonnes ({:.1} km)",
            flow.source, flow.hub, flow.tonnes, flow.distance_km
        );
    }
    out
}
