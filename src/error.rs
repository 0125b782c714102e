//! Error types for fleet initialization and tool invocation.
//!
//! Startup failures are fatal and carry the name of the failing server;
//! call-time failures propagate to the tool's caller unchanged.

use thiserror::Error;

pub type FleetResult<T> = Result<T, InitError>;

/// Failure of a single server during fleet bring-up.
///
/// Aborts the whole fleet initialization. When several servers fail in the
/// same batch, the first failure in configuration order is the one surfaced.
#[derive(Debug, Error)]
#[error("MCP server '{server}' failed to initialize: {source}")]
pub struct InitError {
    server: String,
    #[source]
    source: ConnectorError,
}

impl InitError {
    pub(crate) fn new(server: impl Into<String>, source: ConnectorError) -> Self {
        Self {
            server: server.into(),
            source,
        }
    }

    /// Name of the server that failed.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// The underlying connector failure.
    pub fn details(&self) -> &ConnectorError {
        &self.source
    }
}

/// What went wrong while bringing up one server connection.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Tool discovery failed: {0}")]
    Discovery(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of a single tool invocation after the fleet initialized.
#[derive(Debug, Error)]
pub enum ToolCallError {
    /// The supplied arguments do not satisfy the tool's input schema.
    /// Rejected locally, before anything is sent to the server.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The server-side call failed. Surfaced unchanged, no retry.
    #[error(transparent)]
    Service(#[from] rmcp::service::ServiceError),
}

/// Failure to load or parse a fleet configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
