//! Multi-server MCP tool aggregation.
//!
//! Turns a set of configured MCP server subprocesses into one flat,
//! ready-to-call tool collection for an agent framework: every server is
//! brought up concurrently, its tools discovered and wrapped with argument
//! validation, and the whole fleet torn down again through a single
//! best-effort shutdown.
//!
//! ## Modules
//!
//! - [`fleet`]: concurrent bring-up, aggregation, and composite teardown
//! - [`connector`]: single-server connection lifecycle
//! - [`tool`]: callable tool wrappers
//! - [`config`]: fleet and server configuration
//! - [`schema`]: argument validation against declared input schemas
//! - [`error`]: initialization and invocation error types
//!
//! ## Example
//!
//! ```no_run
//! use mcp_fleet::{initialize_fleet, FleetConfig, FleetOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FleetConfig::from_yaml_str(
//!     r#"
//! servers:
//!   - name: filesystem
//!     command: npx
//!     args: ["-y", "@modelcontextprotocol/server-filesystem", "/tmp"]
//! "#,
//! )?;
//!
//! let fleet = initialize_fleet(config, FleetOptions::default()).await?;
//! for tool in fleet.tools() {
//!     println!("{}: {}", tool.qualified_name(), tool.description());
//! }
//! fleet.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod fleet;
pub mod schema;
pub mod tool;

pub use config::{FleetConfig, FleetOptions, ServerConfig};
pub use connector::ServerConnection;
pub use error::{ConfigError, ConnectorError, FleetResult, InitError, ToolCallError};
pub use fleet::{initialize_fleet, McpFleet};
pub use schema::{ArgumentValidator, JsonObject};
pub use tool::CallableTool;
