use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use routesim_core::prelude::SimulationConfig;
use serde::Deserialize;

/// Contents of the optional TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub run: RunConfig,
}

/// What the headless driver does with a loaded scenario
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Simulated seconds to run
    pub seconds: u32,
    /// Step multiplier passed to every tick
    pub step: f64,
    /// Streets blocked before the run starts
    pub block: Vec<String>,
    /// Traffic level per street name
    pub traffic: BTreeMap<String, u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seconds: 60,
            step: 1.0,
            block: Vec::new(),
            traffic: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Reads the file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }
}
