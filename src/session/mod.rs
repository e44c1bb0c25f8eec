//! Session Module
//!
//! This module contains the stateful-mode bookkeeping:
//! - Session models (binding of an identifier to a protocol engine)
//! - The process-wide `SessionRegistry`

pub mod models;
pub mod registry;

// Re-export commonly used types for convenience
pub use models::{mint_session_id, Session, SessionState};
pub use registry::{SessionRegistry, SharedSessions};
