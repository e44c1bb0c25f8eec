//! Protocol engine
//!
//! A `ProtocolEngine` understands JSON-RPC requests and notifications and is
//! the only component that reads the catalog or runs tools on behalf of a
//! client. Each stateful session owns exactly one engine; stateless requests
//! get a throwaway one.
//!
//! Server-initiated notifications go out on a per-engine broadcast channel,
//! separate from request/response traffic. Whoever holds the transport
//! (an SSE stream, stdout) subscribes to it. Nothing subscribed means the
//! notification is dropped.

use super::handlers::*;
use super::helpers::{is_client_response, resource_list_changed, rpc_error, rpc_success};
use super::models::*;
use super::tools::ToolContext;
use crate::catalog::state::SharedCatalog;
use crate::catalog::CatalogEvent;
use crate::documents::DocumentStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Capacity of the outbound notification channel.
const NOTIFICATION_CHANNEL_CAPACITY: usize = 32;

pub struct ProtocolEngine {
    tools: ToolContext,
    notifications: broadcast::Sender<Value>,
    shutdown: CancellationToken,
}

impl ProtocolEngine {
    pub fn new(catalog: SharedCatalog, store: Arc<dyn DocumentStore>) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self {
            tools: ToolContext { catalog, store },
            notifications,
            shutdown: CancellationToken::new(),
        }
    }

    /// Handles one inbound JSON-RPC message.
    ///
    /// Returns the reply for requests and `None` for notifications and
    /// client responses, which get no reply.
    pub async fn handle(&self, message: Value) -> Option<Value> {
        if is_client_response(&message) {
            tracing::debug!("ignoring client response");
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "invalid JSON-RPC message");
                return Some(rpc_error(Value::Null, INVALID_REQUEST, "Invalid Request"));
            }
        };

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        };

        tracing::debug!(method = %request.method, id = %id, "MCP call");
        let params = request.params.unwrap_or(Value::Null);
        let outcome = self.dispatch(&request.method, params).await;

        Some(match outcome {
            Ok(result) => rpc_success(id, result),
            Err(failure) => rpc_error(id, failure.code, failure.message),
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcFailure> {
        match method {
            INITIALIZE_METHOD => Ok(handle_initialize(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(handle_tools_list()),
            "tools/call" => handle_tool_call(&self.tools, params).await,
            "resources/list" => Ok(handle_resources_list(&self.tools.catalog)),
            "resources/templates/list" => Ok(handle_resource_templates_list()),
            "resources/read" => handle_resources_read(&self.tools.catalog, params).await,
            _ => {
                tracing::debug!(method, "unknown method");
                Err(RpcFailure::new(METHOD_NOT_FOUND, "Method not found"))
            }
        }
    }

    /// Pushes a notification to whoever is listening. Best effort.
    pub fn notify(&self, notification: Value) -> usize {
        self.notifications.send(notification).unwrap_or(0)
    }

    /// Subscribes to server-initiated notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.notifications.subscribe()
    }

    /// Forwards catalog changes to this engine's notification channel until
    /// the engine closes.
    ///
    /// The catalog subscription is taken before this returns, so a change
    /// registered right afterwards is never missed.
    pub fn listen_for_catalog_changes(&self) {
        let mut events = self.tools.catalog.subscribe();
        let outbound = self.notifications.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        // Changes already broadcast (e.g. by this engine's own
                        // last tool call) still go out before the channel closes.
                        while let Ok(CatalogEvent::ListChanged { uri }) = events.try_recv() {
                            tracing::debug!(uri = %uri, "forwarding resource list change on close");
                            let _ = outbound.send(resource_list_changed());
                        }
                        break;
                    }
                    event = events.recv() => match event {
                        Ok(CatalogEvent::ListChanged { uri }) => {
                            tracing::debug!(uri = %uri, "forwarding resource list change");
                            let _ = outbound.send(resource_list_changed());
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "catalog listener lagged");
                            let _ = outbound.send(resource_list_changed());
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    /// Releases the engine. Idempotent.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Resolves once the engine has been closed.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.shutdown.cancelled()
    }
}

impl Drop for ProtocolEngine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
