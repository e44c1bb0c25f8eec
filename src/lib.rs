//! Document Knowledge-Base Library
//!
//! This library serves pre-supplied reports and runtime-generated documents
//! as MCP resources, over a session-bound HTTP endpoint, a stateless HTTP
//! endpoint and stdio.

// Domain modules
pub mod catalog;
pub mod documents;
pub mod mcp;
pub mod session;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod state;
pub mod stdio;
