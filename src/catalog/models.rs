//! Resource Catalog Models
//!
//! This module contains the data structures stored in, and handed out by,
//! the resource catalog.

use crate::documents::{DocumentRef, DocumentStore};
use crate::error::DocumentError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

// =============================================================================
// Producers
// =============================================================================

/// Lazily produces the current text of a resource.
///
/// Producers are invoked fresh on every read and may run concurrently, so
/// implementations must not keep mutable state between invocations.
#[async_trait]
pub trait ContentProducer: Send + Sync {
    async fn produce(&self) -> Result<String, DocumentError>;
}

/// Produces a resource by extracting the text of a stored document.
pub struct DocumentProducer {
    store: Arc<dyn DocumentStore>,
    document: DocumentRef,
}

impl DocumentProducer {
    pub fn new(store: Arc<dyn DocumentStore>, document: DocumentRef) -> Self {
        Self { store, document }
    }
}

#[async_trait]
impl ContentProducer for DocumentProducer {
    async fn produce(&self) -> Result<String, DocumentError> {
        self.store.extract_text(&self.document).await
    }
}

// =============================================================================
// Entries
// =============================================================================

/// Human-readable description of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    /// Optional display title
    pub title: Option<String>,

    /// Description shown in resource listings
    pub description: String,

    /// Content-type tag
    pub mime_type: String,
}

/// One registered resource.
#[derive(Clone)]
pub struct ResourceEntry {
    pub name: String,
    pub uri: String,
    pub metadata: ResourceMetadata,
    pub producer: Arc<dyn ContentProducer>,
}

impl ResourceEntry {
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            name: self.name.clone(),
            uri: self.uri.clone(),
            title: self.metadata.title.clone(),
            description: self.metadata.description.clone(),
            mime_type: self.metadata.mime_type.clone(),
        }
    }
}

/// Listing view of a resource, shaped for `resources/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub name: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub mime_type: String,
}

/// Result of reading a resource, shaped for `resources/read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

// =============================================================================
// Change Events
// =============================================================================

/// Broadcast to every subscribed session when the catalog changes at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A generated resource was registered or replaced
    ListChanged {
        /// URI of the entry that triggered the change
        uri: String,
    },
}
