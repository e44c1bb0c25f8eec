//! MCP Protocol Helpers
//!
//! This module contains helper functions for JSON-RPC communication.

use super::models::{INITIALIZE_METHOD, RESOURCE_LIST_CHANGED};
use serde_json::{json, Value};

/// Builds a JSON-RPC 2.0 success response.
///
/// # Arguments
///
/// * `id` – The request identifier that must be echoed back.
/// * `result` – The payload representing the successful outcome.
///
/// # Returns
///
/// A `serde_json::Value` shaped as a JSON-RPC success envelope.
pub fn rpc_success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Builds a JSON-RPC 2.0 error response.
///
/// # Arguments
///
/// * `id` – The request identifier (or `null` if unavailable).
/// * `code` – The JSON-RPC error code (e.g., -32601 for method not found).
/// * `message` – Human-readable description of the error.
///
/// # Returns
///
/// A `serde_json::Value` shaped as a JSON-RPC error envelope.
pub fn rpc_error(id: Value, code: i32, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}

/// Builds a JSON-RPC 2.0 notification (no `id`).
pub fn rpc_notification(method: &str, params: Option<Value>) -> Value {
    let mut notification = json!({
        "jsonrpc": "2.0",
        "method": method,
    });
    if let Some(params) = params {
        notification["params"] = params;
    }
    notification
}

/// The catalog-changed notification pushed to bound sessions.
pub fn resource_list_changed() -> Value {
    rpc_notification(RESOURCE_LIST_CHANGED, None)
}

/// Returns true when `message` is the handshake request that opens a session.
///
/// The check is on the payload alone: a request (it carries an `id`) whose
/// method is `initialize`.
pub fn is_initialize_request(message: &Value) -> bool {
    message.get("method").and_then(Value::as_str) == Some(INITIALIZE_METHOD)
        && message.get("id").is_some_and(|id| !id.is_null())
}

/// Returns true when `message` is a client reply to a server request.
pub fn is_client_response(message: &Value) -> bool {
    message.get("method").is_none()
        && (message.get("result").is_some() || message.get("error").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_envelopes() {
        let success = rpc_success(json!(1), json!("ok"));
        assert_eq!(success["result"], "ok");
        assert_eq!(success["id"], 1);

        let error = rpc_error(json!(2), -1, "fail");
        assert_eq!(error["error"]["message"], "fail");
        assert_eq!(error["id"], 2);
    }

    #[test]
    fn list_changed_has_no_id() {
        let n = resource_list_changed();
        assert_eq!(n["method"], "notifications/resources/list_changed");
        assert!(n.get("id").is_none());
        assert!(n.get("params").is_none());
    }

    #[test]
    fn initialize_detection() {
        assert!(is_initialize_request(
            &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})
        ));
        assert!(!is_initialize_request(
            &json!({"jsonrpc": "2.0", "method": "initialize"})
        ));
        assert!(!is_initialize_request(
            &json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})
        ));
        assert!(!is_initialize_request(&json!([{"id": 1, "method": "initialize"}])));
    }

    #[test]
    fn client_response_detection() {
        assert!(is_client_response(&json!({"jsonrpc": "2.0", "id": 4, "result": {}})));
        assert!(!is_client_response(&json!({"jsonrpc": "2.0", "id": 4, "method": "ping"})));
    }
}
