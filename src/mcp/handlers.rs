//! MCP method handlers
//!
//! One function per JSON-RPC method. The engine does the dispatch; these
//! only turn parameters into results.

use super::models::*;
use super::tools::{Tool, ToolContext};
use crate::catalog::ResourceCatalog;
use crate::error::{CatalogError, ToolError};
use serde_json::{json, Value};

/// Handles `initialize` request (Handshake).
///
/// Echoes the client's protocol version when supported, otherwise offers
/// the newest one this server speaks.
pub fn handle_initialize(params: &Value) -> Value {
    let requested = params.get("protocolVersion").and_then(Value::as_str);
    let version = requested
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);

    json!({
        "protocolVersion": version,
        "capabilities": {
            "tools": {},
            "resources": { "listChanged": true }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Handles `tools/list` request.
pub fn handle_tools_list() -> Value {
    let tools: Vec<Value> = Tool::ALL.iter().map(|tool| tool.definition()).collect();
    json!({ "tools": tools })
}

/// Handles `resources/list` request.
pub fn handle_resources_list(catalog: &ResourceCatalog) -> Value {
    json!({ "resources": catalog.list() })
}

/// Handles `resources/templates/list` request. No templates are offered.
pub fn handle_resource_templates_list() -> Value {
    json!({ "resourceTemplates": [] })
}

/// Handles `resources/read` request.
pub async fn handle_resources_read(
    catalog: &ResourceCatalog,
    params: Value,
) -> Result<Value, RpcFailure> {
    let params: ReadResourceParams = serde_json::from_value(params)
        .map_err(|e| RpcFailure::new(INVALID_PARAMS, format!("Invalid params: {}", e)))?;

    match catalog.read(&params.uri).await {
        Ok(contents) => Ok(json!({ "contents": [contents] })),
        Err(e @ CatalogError::NotFound(_)) => Err(RpcFailure::new(RESOURCE_NOT_FOUND, e.to_string())),
        Err(e) => {
            tracing::warn!(uri = %params.uri, error = %e, "resource read failed");
            Err(RpcFailure::new(INTERNAL_ERROR, e.to_string()))
        }
    }
}

/// Handles `tools/call` request.
pub async fn handle_tool_call(ctx: &ToolContext, params: Value) -> Result<Value, RpcFailure> {
    let params: CallToolParams = serde_json::from_value(params)
        .map_err(|e| RpcFailure::new(INVALID_PARAMS, format!("Invalid params: {}", e)))?;

    let tool = Tool::from_name(&params.name).ok_or_else(|| {
        RpcFailure::new(
            INVALID_PARAMS,
            ToolError::UnknownTool(params.name.clone()).to_string(),
        )
    })?;

    let args = params.arguments.unwrap_or_else(|| json!({}));
    tool.call(ctx, args)
        .await
        .map(|outcome| outcome.to_value())
        .map_err(|e| RpcFailure::new(INVALID_PARAMS, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_negotiates_version() {
        let echoed = handle_initialize(&json!({ "protocolVersion": "2025-03-26" }));
        assert_eq!(echoed["protocolVersion"], "2025-03-26");
        assert_eq!(echoed["capabilities"]["resources"]["listChanged"], true);

        let fallback = handle_initialize(&json!({ "protocolVersion": "1999-01-01" }));
        assert_eq!(fallback["protocolVersion"], SUPPORTED_PROTOCOL_VERSIONS[0]);

        let missing = handle_initialize(&Value::Null);
        assert_eq!(missing["protocolVersion"], SUPPORTED_PROTOCOL_VERSIONS[0]);
    }

    #[test]
    fn tools_list_exposes_schemas() {
        let listed = handle_tools_list();
        let tool = &listed["tools"][0];
        assert_eq!(tool["name"], "add-generated-resource");
        assert_eq!(tool["inputSchema"]["properties"]["name"]["maxLength"], 80);
        assert!(tool["outputSchema"]["properties"]["success"].is_object());
    }

    #[tokio::test]
    async fn read_unknown_resource() {
        let catalog = ResourceCatalog::new();
        let err = handle_resources_read(&catalog, json!({ "uri": "file:///generated/nope.pdf" }))
            .await
            .unwrap_err();
        assert_eq!(err.code, RESOURCE_NOT_FOUND);

        let err = handle_resources_read(&catalog, json!({})).await.unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);
    }
}
