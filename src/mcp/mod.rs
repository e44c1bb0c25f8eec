//! Model Context Protocol (MCP) Module
//!
//! This module contains all MCP protocol implementation, including:
//! - Protocol models (JsonRpcRequest, error codes, constants)
//! - RPC helpers (success/error envelopes, notifications, handshake detection)
//! - Tool declarations and execution
//! - Method handlers (initialize, tools/list, tools/call, resources/*)
//! - The protocol engine bound to each session

pub mod engine;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod tools;

// Re-export commonly used types and functions
pub use engine::ProtocolEngine;
pub use helpers::is_initialize_request;
pub use tools::{Tool, ToolContext};
