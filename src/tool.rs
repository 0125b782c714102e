//! Callable wrappers around discovered server tools.
//!
//! One [`CallableTool`] per tool a server declares. The wrapper validates
//! arguments against the declared input schema, issues the `tools/call`
//! request through the owning connection's request handle, and returns the
//! JSON encoding of the response content.

use std::borrow::Cow;

use rmcp::{
    model::{CallToolRequestParam, Tool},
    service::Peer,
    RoleClient,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::ToolCallError,
    schema::{ArgumentValidator, JsonObject},
};

pub struct CallableTool {
    server: String,
    name: String,
    description: String,
    validator: ArgumentValidator,
    peer: Peer<RoleClient>,
}

impl CallableTool {
    pub(crate) fn new(server: &str, descriptor: &Tool, peer: Peer<RoleClient>) -> Self {
        Self {
            server: server.to_string(),
            name: descriptor.name.to_string(),
            description: tool_description(descriptor),
            validator: ArgumentValidator::compile(&descriptor.input_schema),
            peer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the server this tool was discovered on.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// `server:tool` form, unique across the fleet.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.server, self.name)
    }

    /// Input contract compiled from the server's declared schema.
    pub fn validator(&self) -> &ArgumentValidator {
        &self.validator
    }

    /// Invoke the tool with a JSON object of arguments.
    ///
    /// `Value::Null` stands for "no arguments". Arguments are checked against
    /// the input schema before anything is sent; server-side failures surface
    /// unchanged.
    pub async fn call(&self, args: Value) -> Result<String, ToolCallError> {
        let args = match args {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            other => {
                return Err(ToolCallError::InvalidArguments(format!(
                    "expected a JSON object, got {other}"
                )))
            }
        };
        self.validator
            .validate(&args)
            .map_err(ToolCallError::InvalidArguments)?;

        info!(
            "Calling tool '{}' on '{}' with {}",
            self.name,
            self.server,
            serde_json::Value::Object(args.clone())
        );

        let result = self
            .peer
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(self.name.clone()),
                arguments: Some(args),
            })
            .await?;

        let output = serde_json::to_string(&result.content).unwrap_or_else(|e| {
            warn!(
                "Failed to serialize result of tool '{}': {}. Falling back to empty content.",
                self.name, e
            );
            "[]".to_string()
        });

        info!(
            "Tool '{}' on '{}' returned {} bytes",
            self.name,
            self.server,
            output.len()
        );
        debug!("Tool '{}' output: {}", self.name, output);

        Ok(output)
    }
}

/// A missing description becomes the empty string, never a placeholder.
fn tool_description(descriptor: &Tool) -> String {
    descriptor
        .description
        .as_deref()
        .unwrap_or_default()
        .to_string()
}
