//! MCP Protocol Models and Constants
//!
//! This module contains all data structures and constants related to the
//! Model Context Protocol (MCP) specification.

use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// MCP Constants
// =============================================================================

/// Server identifier
pub const SERVER_NAME: &str = "knowledge-base-mcp";
/// Protocol versions this server speaks, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];
/// Header carrying the session identifier on stateful requests
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

/// Method name of the handshake request
pub const INITIALIZE_METHOD: &str = "initialize";
/// Notification pushed when the resource list changes
pub const RESOURCE_LIST_CHANGED: &str = "notifications/resources/list_changed";

// =============================================================================
// JSON-RPC Error Codes
// =============================================================================

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
/// Server-defined: missing or unknown session
pub const SESSION_ERROR: i32 = -32000;
/// MCP-defined: unknown resource URI
pub const RESOURCE_NOT_FOUND: i32 = -32002;

// =============================================================================
// MCP Protocol Models
// =============================================================================

/// Standard JSON-RPC 2.0 Request envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0")
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,

    /// Request identifier; absent for notifications
    pub id: Option<Value>,
}

/// Error produced by a method handler, turned into a JSON-RPC error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcFailure {
    pub code: i32,
    pub message: String,
}

impl RpcFailure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Parameters of `resources/read`
#[derive(Debug, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

/// Parameters of `tools/call`
#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}
