//! Stateless MCP endpoint
//!
//! Each POST gets a brand-new engine that is released as soon as the reply
//! is built. Nothing is registered, so server-initiated notifications have
//! no transport to travel on and are never observed by the caller.

use super::{forward, parse_body, protocol_error, STATELESS_PATH};
use crate::mcp::models::INVALID_REQUEST;
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde_json::Value;

/// Creates routes for the stateless endpoint
pub fn routes() -> Router<SharedState> {
    Router::new().route(
        STATELESS_PATH,
        post(handle_post).fallback(method_not_allowed),
    )
}

/// Endpoint: POST /api/mcp/stateless
async fn handle_post(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let message = match parse_body(body) {
        Ok(message) => message,
        Err(response) => return response,
    };

    let engine = state.new_engine();
    let response = forward(&engine, message).await;
    engine.close();
    response
}

/// Any verb but POST on the stateless endpoint
async fn method_not_allowed() -> Response {
    protocol_error(
        StatusCode::METHOD_NOT_ALLOWED,
        INVALID_REQUEST,
        "Method not allowed.",
    )
}
