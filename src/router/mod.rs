//! Routing module for the knowledge-base server

pub mod stateful;
pub mod stateless;

use crate::mcp::helpers::rpc_error;
use crate::mcp::models::{PARSE_ERROR, SESSION_ID_HEADER};
use crate::mcp::ProtocolEngine;
use crate::state::SharedState;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Request},
    http::{HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

/// Path of the session-bound endpoint
pub const STATEFUL_PATH: &str = "/api/mcp/stateful";
/// Path of the per-request endpoint
pub const STATELESS_PATH: &str = "/api/mcp/stateless";

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: Log requests
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        let method = req.method().clone();
        let uri = req.uri().clone();
        tracing::debug!(%method, %uri, "request");
        let res = next.run(req).await;
        if !res.status().is_success() {
            tracing::info!(%method, %uri, status = %res.status(), "request rejected");
        }
        res
    });

    // Middleware: CORS (Permissive, session header readable by browsers)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SESSION_ID_HEADER)]);

    // Routes
    Router::new()
        .merge(stateful::routes())
        .merge(stateless::routes())
        .layer(log_layer)
        .layer(cors_layer)
        .with_state(state)
}

/// Forwards one message to `engine` and relays its reply unchanged.
///
/// Messages that get no reply (notifications, client responses) are
/// acknowledged with 202 Accepted.
pub(crate) async fn forward(engine: &ProtocolEngine, message: Value) -> Response {
    match engine.handle(message).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// JSON-RPC error envelope with no request id, sent with `status`.
pub(crate) fn protocol_error(status: StatusCode, code: i32, message: &str) -> Response {
    (status, Json(rpc_error(Value::Null, code, message))).into_response()
}

/// Unwraps a JSON body, answering malformed input with a parse error.
pub(crate) fn parse_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Response> {
    body.map(|Json(message)| message).map_err(|e| {
        tracing::warn!(error = %e.body_text(), "JSON parse error");
        protocol_error(StatusCode::BAD_REQUEST, PARSE_ERROR, "Parse error")
    })
}
