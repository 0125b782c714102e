//! Fleet orchestration: concurrent bring-up, tool aggregation, teardown.
//!
//! All configured servers are started concurrently and every one is given the
//! chance to settle before results are examined. Startup is all-or-nothing:
//! one failing server fails the whole fleet (after closing whatever did come
//! up). Teardown is the opposite: best-effort, never failing the caller.

use std::{collections::HashMap, fmt};

use futures::future::join_all;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::{
    config::{FleetConfig, FleetOptions},
    connector::{initialize_server, ServerConnection},
    error::{ConnectorError, FleetResult, InitError},
    tool::CallableTool,
};

/// An initialized fleet: every configured server connected, every discovered
/// tool wrapped and aggregated.
///
/// Tool order follows server declaration order, then each server's declared
/// tool order. Call [`McpFleet::shutdown`] when done; dropping the fleet
/// without it leaves subprocess teardown to the protocol client's drop
/// handling.
pub struct McpFleet {
    tools: Vec<CallableTool>,
    connections: Vec<ServerConnection>,
}

impl McpFleet {
    /// All aggregated tools, in declaration order.
    pub fn tools(&self) -> &[CallableTool] {
        &self.tools
    }

    /// First tool with the given simple name, if any.
    pub fn tool(&self, name: &str) -> Option<&CallableTool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Names of the connected servers, in declaration order.
    pub fn server_names(&self) -> Vec<&str> {
        self.connections.iter().map(ServerConnection::name).collect()
    }

    /// Close every server connection.
    ///
    /// All closes run concurrently and all are given the chance to settle.
    /// Individual failures are logged with the owning server's name and
    /// swallowed; shutdown itself never fails.
    pub async fn shutdown(self) {
        info!(
            "Shutting down {} MCP server connection(s)",
            self.connections.len()
        );
        join_all(self.connections.into_iter().map(ServerConnection::close)).await;
    }
}

impl fmt::Debug for McpFleet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpFleet")
            .field("servers", &self.server_names())
            .field("tools", &self.tool_count())
            .finish()
    }
}

/// Bring up every server in `config` concurrently and aggregate their tools.
///
/// Returns the fleet only when every server initialized. On any failure the
/// connections that did come up are closed before the first failure in
/// declaration order is returned; a partially initialized fleet neither
/// escapes nor leaks.
pub async fn initialize_fleet(config: FleetConfig, options: FleetOptions) -> FleetResult<McpFleet> {
    if let Some(level) = options.log_level {
        init_logging(level);
    }

    if let Some(name) = config.duplicate_server() {
        return Err(InitError::new(
            name,
            ConnectorError::Config(format!("duplicate server name '{name}'")),
        ));
    }

    let results = join_all(
        config
            .servers
            .iter()
            .map(|server| initialize_server(server, options.default_path.as_deref())),
    )
    .await;

    let mut tools = Vec::new();
    let mut connections = Vec::new();
    let mut first_failure = None;

    for result in results {
        match result {
            Ok((server_tools, connection)) => {
                tools.extend(server_tools);
                connections.push(connection);
            }
            Err(e) => {
                error!("MCP server '{}' failed to initialize: {}", e.server(), e.details());
                if first_failure.is_none() {
                    first_failure = Some(e);
                }
            }
        }
    }

    if let Some(failure) = first_failure {
        // The other servers may have come up fine; close them before
        // reporting the failure so nothing is left running.
        join_all(connections.into_iter().map(ServerConnection::close)).await;
        return Err(failure);
    }

    warn_on_collisions(&tools);
    info!(
        "Initialized {} MCP server(s) with {} tool(s)",
        config.servers.len(),
        tools.len()
    );
    for tool in &tools {
        debug!("Registered tool '{}'", tool.qualified_name());
    }

    Ok(McpFleet { tools, connections })
}

/// Tool names are only unique per server; flag cross-server duplicates so
/// simple-name lookups don't surprise anyone.
fn warn_on_collisions(tools: &[CallableTool]) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for tool in tools {
        if let Some(existing) = seen.insert(tool.name(), tool.server()) {
            warn!(
                "Tool name collision: '{}' provided by both '{}' and '{}'",
                tool.name(),
                existing,
                tool.server()
            );
        }
    }
}

fn init_logging(level: LevelFilter) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::ServerConfig;

    #[tokio::test]
    async fn empty_fleet_initializes_with_zero_tools() {
        let fleet = initialize_fleet(FleetConfig::default(), FleetOptions::default())
            .await
            .unwrap();
        assert_eq!(fleet.tool_count(), 0);
        assert!(fleet.server_names().is_empty());
        fleet.shutdown().await;
    }

    #[tokio::test]
    async fn duplicate_server_names_are_rejected() {
        let server = ServerConfig {
            name: "twice".to_string(),
            command: "true".to_string(),
            args: vec![],
            env: HashMap::new(),
        };
        let config = FleetConfig {
            servers: vec![server.clone(), server],
        };

        let err = initialize_fleet(config, FleetOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.server(), "twice");
        assert!(err.to_string().contains("duplicate server name"));
    }

    #[tokio::test]
    async fn nonexistent_command_fails_naming_the_server() {
        let config = FleetConfig {
            servers: vec![ServerConfig {
                name: "ghost".to_string(),
                command: "__nonexistent_mcp_server_binary_19284__".to_string(),
                args: vec![],
                env: HashMap::new(),
            }],
        };

        let err = initialize_fleet(config, FleetOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.server(), "ghost");
    }
}
