//! End-to-end fleet tests against scripted mock MCP servers.
//!
//! Each mock is a small python3 stdio JSON-RPC responder that answers the
//! connect handshake, declares the tool list passed on its command line, and
//! echoes `tools/call` arguments back as text content. Tests are skipped when
//! python3 is not available.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Value};

use mcp_fleet::{initialize_fleet, FleetConfig, FleetOptions, ServerConfig};

const MOCK_SERVER: &str = r#"
import json
import sys

FAIL_LIST = len(sys.argv) > 1 and sys.argv[1] == "fail-list"
TOOLS = json.loads(sys.argv[1]) if len(sys.argv) > 1 and not FAIL_LIST else []

def respond(payload):
    sys.stdout.write(json.dumps(payload) + "\n")
    sys.stdout.flush()

for line in sys.stdin:
    line = line.strip()
    if not line:
        continue
    msg = json.loads(line)
    method = msg.get("method")
    msg_id = msg.get("id")
    if method == "initialize":
        respond({
            "jsonrpc": "2.0",
            "id": msg_id,
            "result": {
                "protocolVersion": msg["params"]["protocolVersion"],
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "mock-server", "version": "0.0.1"},
            },
        })
    elif method == "tools/list":
        if FAIL_LIST:
            respond({
                "jsonrpc": "2.0",
                "id": msg_id,
                "error": {"code": -32603, "message": "tool listing unavailable"},
            })
        else:
            respond({"jsonrpc": "2.0", "id": msg_id, "result": {"tools": TOOLS}})
    elif method == "tools/call":
        text = "echo: " + str(msg["params"].get("arguments", {}).get("text", ""))
        respond({
            "jsonrpc": "2.0",
            "id": msg_id,
            "result": {
                "content": [{"type": "text", "text": text}],
                "isError": False,
            },
        })
    elif msg_id is not None:
        respond({
            "jsonrpc": "2.0",
            "id": msg_id,
            "error": {"code": -32601, "message": "Method not found"},
        })
"#;

async fn python3_available() -> bool {
    tokio::process::Command::new("python3")
        .arg("--version")
        .output()
        .await
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn write_mock_script(dir: &Path) -> String {
    let path = dir.join("mock_mcp_server.py");
    std::fs::write(&path, MOCK_SERVER).unwrap();
    path.to_string_lossy().to_string()
}

fn mock_server(name: &str, script: &str, tools: Value) -> ServerConfig {
    ServerConfig {
        name: name.to_string(),
        command: "python3".to_string(),
        args: vec![script.to_string(), tools.to_string()],
        env: HashMap::new(),
    }
}

fn alpha_tools() -> Value {
    json!([
        {
            "name": "echo",
            "description": "Echo input back",
            "inputSchema": {
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            }
        },
        {
            "name": "ping",
            "inputSchema": {"type": "object", "properties": {}}
        }
    ])
}

#[tokio::test]
async fn fleet_aggregates_tools_in_declaration_order() {
    if !python3_available().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let script = write_mock_script(dir.path());

    let config = FleetConfig {
        servers: vec![
            mock_server("alpha", &script, alpha_tools()),
            mock_server("beta", &script, json!([])),
        ],
    };

    let fleet = initialize_fleet(config, FleetOptions::default())
        .await
        .unwrap();

    // alpha declares 2 tools, beta none; both attributable to alpha, in
    // alpha's declared order.
    assert_eq!(fleet.tool_count(), 2);
    assert_eq!(fleet.server_names(), vec!["alpha", "beta"]);
    assert_eq!(fleet.tools()[0].name(), "echo");
    assert_eq!(fleet.tools()[1].name(), "ping");
    assert_eq!(fleet.tools()[0].server(), "alpha");
    assert_eq!(fleet.tools()[1].server(), "alpha");

    assert_eq!(fleet.tools()[0].description(), "Echo input back");
    // A tool without a description gets the empty string, never a placeholder.
    assert_eq!(fleet.tools()[1].description(), "");

    fleet.shutdown().await;
}

#[tokio::test]
async fn tool_call_returns_json_encoded_content() {
    if !python3_available().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let script = write_mock_script(dir.path());

    let config = FleetConfig {
        servers: vec![mock_server("alpha", &script, alpha_tools())],
    };
    let fleet = initialize_fleet(config, FleetOptions::default())
        .await
        .unwrap();

    let result = fleet
        .tool("echo")
        .unwrap()
        .call(json!({"text": "hello"}))
        .await
        .unwrap();

    // The result is the JSON encoding of the response content, verbatim.
    let parsed: Value = serde_json::from_str(&result).unwrap();
    assert_eq!(parsed, json!([{"type": "text", "text": "echo: hello"}]));

    fleet.shutdown().await;
}

#[tokio::test]
async fn invalid_arguments_are_rejected_before_the_wire() {
    if !python3_available().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let script = write_mock_script(dir.path());

    let config = FleetConfig {
        servers: vec![mock_server("alpha", &script, alpha_tools())],
    };
    let fleet = initialize_fleet(config, FleetOptions::default())
        .await
        .unwrap();
    let echo = fleet.tool("echo").unwrap();

    let err = echo.call(json!({})).await.unwrap_err();
    assert!(err.to_string().contains("missing required property 'text'"));

    let err = echo.call(json!({"text": 42})).await.unwrap_err();
    assert!(err.to_string().contains("should be of type 'string'"));

    let err = echo.call(json!("not an object")).await.unwrap_err();
    assert!(err.to_string().contains("expected a JSON object"));

    fleet.shutdown().await;
}

#[tokio::test]
async fn one_failing_server_fails_the_whole_fleet() {
    if !python3_available().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let script = write_mock_script(dir.path());

    let config = FleetConfig {
        servers: vec![
            mock_server("alpha", &script, alpha_tools()),
            ServerConfig {
                name: "broken".to_string(),
                command: "__nonexistent_mcp_server_binary_55121__".to_string(),
                args: vec![],
                env: HashMap::new(),
            },
        ],
    };

    let err = initialize_fleet(config, FleetOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.server(), "broken");
}

#[tokio::test]
async fn discovery_failure_after_handshake_fails_the_fleet() {
    if !python3_available().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let script = write_mock_script(dir.path());

    // gamma completes the connect handshake but cannot list tools; its
    // transport is closed and the fleet fails naming it, while alpha's
    // otherwise-successful connection is torn down rather than leaked.
    let config = FleetConfig {
        servers: vec![
            mock_server("alpha", &script, alpha_tools()),
            ServerConfig {
                name: "gamma".to_string(),
                command: "python3".to_string(),
                args: vec![script.clone(), "fail-list".to_string()],
                env: HashMap::new(),
            },
        ],
    };

    let err = initialize_fleet(config, FleetOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.server(), "gamma");
    assert!(err.to_string().contains("failed to initialize"));
}

#[tokio::test]
async fn shutdown_always_resolves() {
    if !python3_available().await {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let script = write_mock_script(dir.path());

    let config = FleetConfig {
        servers: vec![
            mock_server("alpha", &script, alpha_tools()),
            mock_server("beta", &script, json!([])),
        ],
    };
    let fleet = initialize_fleet(config, FleetOptions::default())
        .await
        .unwrap();

    // Never rejects, regardless of how the underlying closes fare.
    fleet.shutdown().await;
}
