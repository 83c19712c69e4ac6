// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_SOURCE_URL: &str =
    "https://en.wikipedia.org/wiki/Fuel_economy_in_aircraft#Example_values";

/// Names and tokens that tie the pipeline to one document's layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Title given to tables that precede every heading.
    pub untitled: String,
    /// A table is kept when any column name starts with this (case-sensitive).
    pub domain_prefix: String,
    /// Older column name renamed to `canonical_column`.
    pub legacy_column: String,
    pub canonical_column: String,
    /// Unit suffix that must follow the number, e.g. `L/100 km`.
    pub unit_label: String,
    /// Column providing the default ascending sort order.
    pub chronological_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            untitled: "Untitled".into(),
            domain_prefix: "Fuel".into(),
            legacy_column: "Fuel efficiency per seat".into(),
            canonical_column: "Fuel per seat".into(),
            unit_label: "L/100 km".into(),
            chronological_column: "First flight".into(),
        }
    }
}

impl PipelineConfig {
    /// Name of the nullable numeric column derived from `canonical_column`.
    pub fn derived_column(&self) -> String {
        format!("{} ({})", self.canonical_column, self.unit_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub source_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.into(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub pipeline: PipelineConfig,
    pub output_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            pipeline: PipelineConfig::default(),
            output_path: PathBuf::from("output/fuel_tables.json"),
        }
    }
}

impl AppConfig {
    /// Read a YAML config file; missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg: AppConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(cfg)
    }

    /// `FUELTABLES_CONFIG` names an optional YAML file; `SOURCE_URL` and
    /// `OUTPUT_PATH` override whatever it sets.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var("FUELTABLES_CONFIG") {
            Ok(path) => {
                info!(path = %path, "loading config file");
                Self::from_file(&path)?
            }
            Err(_) => {
                debug!("FUELTABLES_CONFIG not set; using defaults");
                Self::default()
            }
        };
        if let Ok(url) = env::var("SOURCE_URL") {
            cfg.fetch.source_url = url;
        }
        if let Ok(path) = env::var("OUTPUT_PATH") {
            cfg.output_path = PathBuf::from(path);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.fetch.source_url)
            .with_context(|| format!("invalid source URL {}", self.fetch.source_url))?;
        if self.pipeline.canonical_column.is_empty() {
            anyhow::bail!("pipeline.canonical_column must not be empty");
        }
        Ok(())
    }
}
