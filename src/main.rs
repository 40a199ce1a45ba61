use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feedstock_hub_optimizer::{
    api,
    config::{Config, DEFAULT_CONFIG_PATH},
    dataset,
    domain::Instance,
    optimizer::{MicroLpEngine, SolveInvoker},
    telemetry, Planner,
};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "hub-optimizer", version, about = "Feedstock hub location and routing planner")]
struct Cli {
    /// Configuration file (TOML); HUBOPT__* environment variables override it
    #[arg(long, short, env = "HUBOPT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve the configured network once and print the plan
    Solve,
    /// Serve the planning API over HTTP
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;

    let planner = Planner::new(
        SolveInvoker::new(Arc::new(MicroLpEngine), cfg.solver.time_limit()),
        cfg.solver.activation_bound,
    );

    match cli.command.unwrap_or(Command::Solve) {
        Command::Solve => solve(&cfg, &planner).await,
        Command::Serve => serve(&cfg, planner).await,
    }
}

async fn solve(cfg: &Config, planner: &Planner) -> Result<()> {
    let (sources, hubs) =
        dataset::load_network(cfg.data.sources_csv.as_deref(), cfg.data.hubs_csv.as_deref())?;

    let instance = Instance::builder()
        .sources(sources)
        .hubs(hubs)
        .parameters(cfg.parameters.clone())
        .build()
        .context("building planning instance")?;

    let report = planner.plan(&instance).await.context("planning run failed")?;

    println!("{}", dataset::format_summary(&report));

    if let Some(path) = &cfg.output.report_json {
        dataset::write_report_json(&report, path)?;
        info!(path = %path.display(), "report written");
    }
    if let Some(path) = &cfg.output.transport_csv {
        dataset::write_transport_csv(&report, path)?;
        info!(path = %path.display(), "transport plan written");
    }

    Ok(())
}

async fn serve(cfg: &Config, planner: Planner) -> Result<()> {
    let app = api::router(api::AppState::new(planner), cfg);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0 - the planning API will be reachable from the network");
    }

    info!(%addr, "starting hub optimizer API");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
