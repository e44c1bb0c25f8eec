//! Stateful MCP endpoint
//!
//! Every client gets its own protocol engine, bound on the `initialize`
//! handshake and addressed afterwards through the `mcp-session-id` header.
//!
//! - `POST` carries requests and notifications. An `initialize` request
//!   opens a new session; anything else must name a live one.
//! - `GET` opens the server-to-client notification stream (SSE).
//! - `DELETE` tears the session down.
//!
//! Requests naming a missing or unknown session are refused with a Bad
//! Request error and never reach an engine.

use super::{forward, parse_body, protocol_error, STATEFUL_PATH};
use crate::mcp::helpers::is_initialize_request;
use crate::mcp::models::{INTERNAL_ERROR, SESSION_ERROR, SESSION_ID_HEADER};
use crate::session::{mint_session_id, Session, SharedSessions};
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Message of the error returned for missing or unknown sessions
pub const INVALID_SESSION_MESSAGE: &str = "Bad Request: No valid session ID provided";
/// Message of the error returned for a second notification stream
pub const STREAM_CONFLICT_MESSAGE: &str = "Conflict: Only one SSE stream is allowed per session";

/// Creates routes for the stateful endpoint
pub fn routes() -> Router<SharedState> {
    Router::new().route(
        STATEFUL_PATH,
        post(handle_post).get(handle_get).delete(handle_delete),
    )
}

/// Endpoint: POST /api/mcp/stateful
async fn handle_post(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let message = match parse_body(body) {
        Ok(message) => message,
        Err(response) => return response,
    };

    if is_initialize_request(&message) {
        return open_session(&state, message).await;
    }

    match resolve_session(&state, &headers) {
        Ok(session) => forward(session.engine(), message).await,
        Err(response) => response,
    }
}

/// Endpoint: GET /api/mcp/stateful
///
/// Streams the session's notifications. The stream ends when the session
/// closes, and dropping it (client disconnect) closes the session. Only one
/// stream per session; a second GET is refused with 409 Conflict.
async fn handle_get(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = match resolve_session(&state, &headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    if !session.claim_stream() {
        tracing::debug!(session_id = %session.id(), "notification stream already open");
        return protocol_error(StatusCode::CONFLICT, SESSION_ERROR, STREAM_CONFLICT_MESSAGE);
    }

    let guard = TransportGuard {
        sessions: state.sessions.clone(),
        session_id: session.id().to_string(),
    };
    let mut notifications = session.engine().subscribe();
    tracing::debug!(session_id = %session.id(), "notification stream opened");

    let stream = async_stream::stream! {
        let _guard = guard;
        loop {
            let received = tokio::select! {
                _ = session.engine().closed() => break,
                received = notifications.recv() => received,
            };
            match received {
                Ok(notification) => {
                    yield Ok::<Event, Infallible>(
                        Event::default().event("message").data(notification.to_string()),
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(session_id = %session.id(), skipped, "notification stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Endpoint: DELETE /api/mcp/stateful
async fn handle_delete(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    match resolve_session(&state, &headers) {
        Ok(session) => {
            state.sessions.remove(session.id());
            StatusCode::OK.into_response()
        }
        Err(response) => response,
    }
}

/// Binds a fresh engine under a new session id and completes the handshake.
async fn open_session(state: &SharedState, message: Value) -> Response {
    let session_id = mint_session_id();
    let engine = state.new_engine();
    engine.listen_for_catalog_changes();

    let session = match state.sessions.create(&session_id, engine) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "failed to register session");
            return protocol_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR,
                "Internal error",
            );
        }
    };

    let mut response = forward(session.engine(), message).await;
    match HeaderValue::from_str(session.id()) {
        Ok(value) => {
            response.headers_mut().insert(SESSION_ID_HEADER, value);
        }
        Err(e) => tracing::error!(error = %e, "session id is not a valid header value"),
    }
    response
}

/// Finds the live session named by the request's session header.
fn resolve_session(state: &SharedState, headers: &HeaderMap) -> Result<Arc<Session>, Response> {
    headers
        .get(SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|id| state.sessions.lookup(id).ok())
        .ok_or_else(|| {
            protocol_error(StatusCode::BAD_REQUEST, SESSION_ERROR, INVALID_SESSION_MESSAGE)
        })
}

/// Closes the session when the notification stream goes away.
struct TransportGuard {
    sessions: SharedSessions,
    session_id: String,
}

impl Drop for TransportGuard {
    fn drop(&mut self) {
        if self.sessions.remove(&self.session_id).is_some() {
            tracing::debug!(session_id = %self.session_id, "notification stream dropped");
        }
    }
}
