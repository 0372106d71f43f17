//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::infra::error::SimError;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Cap on the simulated population
    #[serde(default = "default_tracked_assets")]
    pub tracked_assets: usize,
    /// Assets returned per query
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Inverse speed scale: each segment is traversed in `1 / dist_step` steps
    #[serde(default = "default_dist_step")]
    pub dist_step: f64,
    /// Seed for asset type assignment (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tracked_assets() -> usize {
    50_000
}

fn default_page_size() -> usize {
    10_000
}

fn default_dist_step() -> f64 {
    0.1
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tracked_assets: default_tracked_assets(),
            page_size: default_page_size(),
            dist_step: default_dist_step(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Polyline feature set (JSON)
    #[serde(default = "default_paths_file")]
    pub paths_file: String,
}

fn default_paths_file() -> String {
    "data/paths.json".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { paths_file: default_paths_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Query server HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: default_bind_address(), port: default_port() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    10
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EgressConfig {
    /// File path for page dumps (JSONL format)
    #[serde(default = "default_egress_file")]
    pub file: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self { file: default_egress_file() }
    }
}

fn default_egress_file() -> String {
    "pages.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub egress: EgressConfig,
}

/// Command line selection of the config file, shared by the binaries
#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to TOML configuration file
    #[arg(short, long, env = "CONFIG_FILE", default_value = "config/dev.toml")]
    pub config: String,

    /// Polyline feature set (overrides input.paths_file)
    #[arg(short, long)]
    pub paths: Option<String>,
}

impl ConfigArgs {
    /// Load the selected config file (defaults on failure) and apply overrides
    pub fn load(&self) -> Config {
        let config = Config::load_from_path(&self.config);
        match &self.paths {
            Some(paths) => config.with_paths_file(paths),
            None => config,
        }
    }
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    tracked_assets: usize,
    page_size: usize,
    dist_step: f64,
    seed: Option<u64>,
    paths_file: String,
    bind_address: String,
    port: u16,
    metrics_interval_secs: u64,
    egress_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            tracked_assets: toml_config.simulation.tracked_assets,
            page_size: toml_config.simulation.page_size,
            dist_step: toml_config.simulation.dist_step,
            seed: toml_config.simulation.seed,
            paths_file: toml_config.input.paths_file,
            bind_address: toml_config.server.bind_address,
            port: toml_config.server.port,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            egress_file: toml_config.egress.file,
            config_file,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    /// Reject settings the paging and speed computations cannot use
    pub fn validate(&self) -> Result<(), SimError> {
        if self.page_size == 0 {
            return Err(SimError::InvalidConfig("page_size must be greater than 0".to_string()));
        }
        if !self.dist_step.is_finite() || self.dist_step <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "dist_step must be a finite positive number, got {}",
                self.dist_step
            )));
        }
        Ok(())
    }

    pub fn tracked_assets(&self) -> usize {
        self.tracked_assets
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn dist_step(&self) -> f64 {
        self.dist_step
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn paths_file(&self) -> &str {
        &self.paths_file
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn egress_file(&self) -> &str {
        &self.egress_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method to override the simulation parameters
    pub fn with_simulation(mut self, tracked_assets: usize, page_size: usize, dist_step: f64) -> Self {
        self.tracked_assets = tracked_assets;
        self.page_size = page_size;
        self.dist_step = dist_step;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_paths_file(mut self, paths_file: &str) -> Self {
        self.paths_file = paths_file.to_string();
        self
    }
}
