//! Application State
//!
//! Holds the process-lifetime registries. Built once at startup and passed
//! explicitly to the router and transports.

use crate::catalog::reports::populate;
use crate::catalog::state::SharedCatalog;
use crate::catalog::ResourceCatalog;
use crate::config::ServerConfig;
use crate::documents::{DocumentStore, FsDocumentStore};
use crate::error::DocumentError;
use crate::mcp::ProtocolEngine;
use crate::session::{SessionRegistry, SharedSessions};
use std::sync::Arc;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    /// Addressable documents, shared by every engine
    pub catalog: SharedCatalog,

    /// Live stateful sessions
    pub sessions: SharedSessions,

    /// Document persistence collaborator
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Builds the registries and populates the catalog from disk.
    pub async fn initialize(config: &ServerConfig) -> Result<SharedState, DocumentError> {
        tracing::info!(
            resources_dir = %config.resources_dir.display(),
            generated_dir = %config.generated_dir.display(),
            "using document directories"
        );
        let store: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::new(
            &config.resources_dir,
            &config.generated_dir,
        ));
        Self::with_store(store).await
    }

    /// Builds the registries around an existing document store.
    pub async fn with_store(store: Arc<dyn DocumentStore>) -> Result<SharedState, DocumentError> {
        let catalog = Arc::new(ResourceCatalog::new());
        populate(&catalog, store.clone()).await?;

        Ok(Arc::new(Self {
            catalog,
            sessions: Arc::new(SessionRegistry::new()),
            store,
        }))
    }

    /// A fresh engine wired to the shared catalog and tools.
    pub fn new_engine(&self) -> ProtocolEngine {
        ProtocolEngine::new(self.catalog.clone(), self.store.clone())
    }
}
