//! Session Models
//!
//! A session binds a client-visible identifier to exactly one protocol
//! engine. Both are created together and released together.

use crate::mcp::ProtocolEngine;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Lifecycle of a registered session.
///
/// A session only exists once its handshake succeeded, so there is no
/// variant for the uninitialized state: an unknown identifier is that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Closed,
}

/// One logical client connection in stateful mode.
pub struct Session {
    id: String,
    engine: ProtocolEngine,
    /// Set once a notification stream has been attached
    streaming: AtomicBool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

impl Session {
    pub fn new(id: impl Into<String>, engine: ProtocolEngine) -> Self {
        Self {
            id: id.into(),
            engine,
            streaming: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &ProtocolEngine {
        &self.engine
    }

    pub fn state(&self) -> SessionState {
        if self.engine.is_closed() {
            SessionState::Closed
        } else {
            SessionState::Active
        }
    }

    /// Claims the session's single notification stream.
    ///
    /// Returns false when a stream is already attached. The claim is never
    /// released: the stream going away closes the session.
    pub fn claim_stream(&self) -> bool {
        self.streaming
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Creates a new opaque session identifier.
pub fn mint_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceCatalog;
    use crate::documents::FsDocumentStore;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(
            "s1",
            ProtocolEngine::new(
                Arc::new(ResourceCatalog::new()),
                Arc::new(FsDocumentStore::new("resources", "generated")),
            ),
        )
    }

    #[test]
    fn only_one_stream_can_be_claimed() {
        let session = session();
        assert!(session.claim_stream());
        assert!(!session.claim_stream());
    }

    #[test]
    fn debug_shows_id_and_state() {
        let rendered = format!("{:?}", session());
        assert!(rendered.contains("\"s1\""));
        assert!(rendered.contains("Active"));
    }
}
