//! Client settings loaded from TOML or RON

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tank_engine::config::{Config, ConfigError, EngineConfig};
use tank_engine::spatial::DEFAULT_GRID_SIZE;

use crate::protocol::{TeamType, DEFAULT_PORT};
use crate::variables::{VariableDatabase, VariableError};

/// Where to connect and who to be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Callsign; a random one is picked when unset
    pub callsign: Option<String>,
    /// Tag shown next to the callsign
    pub tag: String,
    /// Requested team
    pub team: TeamType,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            callsign: None,
            tag: String::new(),
            team: TeamType::Rogue,
        }
    }
}

/// Frame pacing and world partitioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed frames per second of the headless loop
    pub frame_rate: u32,
    /// Columns and rows of the world grid
    pub grid_size: (u16, u16),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Everything the client reads at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logging and diagnostics
    pub engine: EngineConfig,
    /// Connection settings
    pub client: ClientConfig,
    /// Loop and grid settings
    pub simulation: SimulationConfig,
    /// Game variable overrides by name
    pub variables: BTreeMap<String, f64>,
}

impl GameConfig {
    /// Check values serde cannot check
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.client.host.trim().is_empty() {
            return Err(ConfigError::Invalid("client.host must not be empty".to_string()));
        }
        if self.client.port == 0 {
            return Err(ConfigError::Invalid("client.port must not be 0".to_string()));
        }
        if self.client.callsign.as_deref().is_some_and(|callsign| callsign.trim().is_empty()) {
            return Err(ConfigError::Invalid("client.callsign must not be blank".to_string()));
        }
        if self.simulation.frame_rate == 0 {
            return Err(ConfigError::Invalid("simulation.frame_rate must be positive".to_string()));
        }

        let (columns, rows) = self.simulation.grid_size;
        let valid = |cells: u16| cells != 0 && cells % 2 == 0 && cells <= 512;
        if !valid(columns) || !valid(rows) {
            return Err(ConfigError::Invalid(format!(
                "simulation.grid_size must be even and between 2 and 512, got {columns}x{rows}"
            )));
        }
        Ok(())
    }

    /// Apply the variable overrides
    ///
    /// # Errors
    ///
    /// Fails on the first unknown variable or unrepresentable value.
    pub fn apply_variables(&self, variables: &mut VariableDatabase) -> Result<(), VariableError> {
        for (name, value) in &self.variables {
            variables.set_from_f64(name, *value)?;
            log::debug!("Variable {name} set to {value}");
        }
        Ok(())
    }
}

impl Config for GameConfig {}
