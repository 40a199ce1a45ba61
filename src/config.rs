use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::domain::CostParameters;
use crate::optimizer::ActivationBound;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "HUBOPT__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub solver: SolverConfig,
    pub parameters: CostParameters,
    pub data: DataConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Allow browser calls from a local dashboard on port 3000
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 120,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub time_limit_seconds: u64,
    pub activation_bound: ActivationBound,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 60,
            activation_bound: ActivationBound::TotalSupply,
        }
    }
}

impl SolverConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_seconds)
    }
}

/// Site CSVs; a missing path falls back to the built-in sample
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub sources_csv: Option<PathBuf>,
    pub hubs_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_json: Option<PathBuf>,
    pub transport_csv: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::figment(path)
            .extract()
            .with_context(|| format!("loading configuration from {}", path.display()))
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
