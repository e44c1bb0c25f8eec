//! Session Registry
//!
//! Maps session identifiers to live sessions. Per-identifier operations are
//! atomic: `create` checks and inserts under one shard lock, and `remove`
//! takes the entry out before the engine is released.

use super::models::Session;
use crate::error::SessionError;
use crate::mcp::ProtocolEngine;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

/// Shared handle to the registry
pub type SharedSessions = Arc<SessionRegistry>;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `engine` to `id`. Fails if `id` is already registered.
    pub fn create(&self, id: &str, engine: ProtocolEngine) -> Result<Arc<Session>, SessionError> {
        match self.sessions.entry(id.to_string()) {
            Entry::Occupied(_) => Err(SessionError::Duplicate(id.to_string())),
            Entry::Vacant(slot) => {
                let session = Arc::new(Session::new(id, engine));
                slot.insert(session.clone());
                tracing::info!(session_id = %id, "session created");
                Ok(session)
            }
        }
    }

    pub fn lookup(&self, id: &str) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Unregisters `id` and releases its engine.
    ///
    /// Removing an absent id is a no-op: teardown can race with a client
    /// closing the same session.
    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(id)?;
        session.engine().close();
        tracing::info!(session_id = %id, "session closed");
        Some(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceCatalog;
    use crate::documents::FsDocumentStore;
    use crate::session::{mint_session_id, SessionState};

    fn engine() -> ProtocolEngine {
        ProtocolEngine::new(
            Arc::new(ResourceCatalog::new()),
            Arc::new(FsDocumentStore::new("resources", "generated")),
        )
    }

    #[test]
    fn create_then_lookup() {
        let registry = SessionRegistry::new();
        let id = mint_session_id();

        let created = registry.create(&id, engine()).unwrap();
        let found = registry.lookup(&id).unwrap();
        assert!(Arc::ptr_eq(&created, &found));
        assert_eq!(found.state(), SessionState::Active);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let registry = SessionRegistry::new();
        registry.create("s1", engine()).unwrap();

        let err = registry.create("s1", engine()).unwrap_err();
        assert_eq!(err, SessionError::Duplicate("s1".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_closes_and_is_idempotent() {
        let registry = SessionRegistry::new();
        let session = registry.create("s1", engine()).unwrap();

        assert!(registry.remove("s1").is_some());
        assert_eq!(session.state(), SessionState::Closed);
        assert!(registry.remove("s1").is_none());
        assert!(registry.remove("never-existed").is_none());
        assert_eq!(
            registry.lookup("s1").unwrap_err(),
            SessionError::NotFound("s1".into())
        );
    }

    #[test]
    fn sessions_are_independent() {
        let registry = SessionRegistry::new();
        let a = mint_session_id();
        let b = mint_session_id();
        assert_ne!(a, b);

        registry.create(&a, engine()).unwrap();
        let session_b = registry.create(&b, engine()).unwrap();
        registry.remove(&a);

        assert!(registry.lookup(&a).is_err());
        assert!(registry.lookup(&b).is_ok());
        assert_eq!(session_b.state(), SessionState::Active);
    }
}
