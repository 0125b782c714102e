//! Single-server connection lifecycle: spawn, handshake, discovery, close.

use rmcp::{
    service::RunningService,
    transport::{ConfigureCommandExt, TokioChildProcess},
    RoleClient, ServiceExt,
};
use tracing::{debug, info, warn};

use crate::{
    config::ServerConfig,
    error::{ConnectorError, InitError},
    tool::CallableTool,
};

/// Type alias for an MCP client connection.
pub(crate) type McpClient = RunningService<RoleClient, ()>;

/// A live connection to one MCP server subprocess.
///
/// Uniquely owns the running service. [`ServerConnection::close`] consumes
/// the connection, so the transport is shut down at most once; the callable
/// tools only hold request handles, which simply start failing once the
/// connection is gone.
pub struct ServerConnection {
    name: String,
    client: McpClient,
}

impl ServerConnection {
    /// The server's configured name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shut the connection down, closing the subprocess transport.
    ///
    /// Failures are logged with the owning server's name and otherwise
    /// swallowed; teardown is best-effort by design.
    pub async fn close(self) {
        match self.client.cancel().await {
            Ok(_) => info!("Closed connection to MCP server '{}'", self.name),
            Err(e) => warn!("Error closing connection to MCP server '{}': {}", self.name, e),
        }
    }
}

/// Bring up one server: spawn the subprocess, run the connect handshake,
/// discover its tools, and wrap each as a [`CallableTool`].
///
/// Any failure is fatal to this server and reported as an [`InitError`]
/// naming it; nothing is retried here.
pub(crate) async fn initialize_server(
    config: &ServerConfig,
    default_path: Option<&str>,
) -> Result<(Vec<CallableTool>, ServerConnection), InitError> {
    let client = connect(config, default_path)
        .await
        .map_err(|e| InitError::new(&config.name, e))?;

    let descriptors = match client.peer().list_all_tools().await {
        Ok(descriptors) => descriptors,
        Err(e) => {
            // The transport is live at this point; close it before surfacing
            // the discovery failure. A secondary close failure is logged and
            // never replaces the original error.
            if let Err(close_err) = client.cancel().await {
                warn!(
                    "Error closing connection to MCP server '{}' after failed discovery: {}",
                    config.name, close_err
                );
            }
            return Err(InitError::new(
                &config.name,
                ConnectorError::Discovery(format!("list tools: {e}")),
            ));
        }
    };

    info!(
        "Discovered {} tools from MCP server '{}'",
        descriptors.len(),
        config.name
    );

    let peer = client.peer().clone();
    let tools = descriptors
        .iter()
        .map(|descriptor| CallableTool::new(&config.name, descriptor, peer.clone()))
        .collect();

    Ok((
        tools,
        ServerConnection {
            name: config.name.clone(),
            client,
        },
    ))
}

/// Spawn the subprocess and run the MCP connect handshake.
///
/// The child is launched with exactly the effective environment from
/// [`ServerConfig::effective_env`]; stderr passes through to the parent's.
/// When the handshake fails the protocol client tears the child down itself,
/// so there is no transport left to clean up on this path.
async fn connect(
    config: &ServerConfig,
    default_path: Option<&str>,
) -> Result<McpClient, ConnectorError> {
    let env = config.effective_env(default_path);

    debug!(
        "Connecting to MCP server '{}': {} {:?}",
        config.name, config.command, config.args
    );

    let transport = TokioChildProcess::new(tokio::process::Command::new(&config.command).configure(
        |cmd| {
            cmd.args(&config.args)
                .env_clear()
                .envs(&env)
                .stderr(std::process::Stdio::inherit());
        },
    ))
    .map_err(|e| ConnectorError::Transport(format!("create stdio transport: {e}")))?;

    let client = ().serve(transport).await.map_err(|e| {
        ConnectorError::ConnectionFailed(format!("initialize stdio client: {e}"))
    })?;

    info!("Connected to MCP server '{}'", config.name);
    Ok(client)
}
