//! Fleet configuration types and utilities.
//!
//! A fleet is declared as an ordered list of named stdio server definitions.
//! Declaration order is the order tools are aggregated in; names must be
//! unique within one fleet.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::error::ConfigError;

/// Environment variable consulted when a server config carries no search path
/// of its own. Some servers silently fail to resolve their own executable
/// dependencies without it.
pub(crate) const PATH_VAR: &str = "PATH";

/// Launch definition for one MCP server subprocess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Unique name within the fleet; used in logs and error reports.
    pub name: String,

    /// Executable to spawn.
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Environment for the subprocess. The child is launched with exactly
    /// this environment (plus the inherited search path, see
    /// [`ServerConfig::effective_env`]), not the parent's.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ServerConfig {
    /// Environment the child process is launched with.
    ///
    /// Starts from the configured `env`; when that carries no `PATH` entry,
    /// `default_path` is inserted.
    pub fn effective_env(&self, default_path: Option<&str>) -> HashMap<String, String> {
        let mut env = self.env.clone();
        if !env.contains_key(PATH_VAR) {
            if let Some(path) = default_path {
                env.insert(PATH_VAR.to_string(), path.to_string());
            }
        }
        env
    }
}

/// The full set of servers managed by one [`initialize_fleet`] call.
///
/// [`initialize_fleet`]: crate::fleet::initialize_fleet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

impl FleetConfig {
    /// Parse a fleet configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a fleet configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// First server name that appears more than once, if any.
    pub(crate) fn duplicate_server(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.servers
            .iter()
            .find(|server| !seen.insert(server.name.as_str()))
            .map(|server| server.name.as_str())
    }
}

/// Options for fleet bring-up.
#[derive(Debug, Clone)]
pub struct FleetOptions {
    /// When set, installs a fmt subscriber at this minimum level. An already
    /// installed global subscriber wins.
    pub log_level: Option<LevelFilter>,

    /// Search path handed to servers whose config omits `PATH`. Captured once
    /// from the ambient process environment by [`FleetOptions::default`];
    /// tests can substitute their own.
    pub default_path: Option<String>,
}

impl Default for FleetOptions {
    fn default() -> Self {
        Self {
            log_level: None,
            default_path: std::env::var(PATH_VAR).ok(),
        }
    }
}
