//! Resource Catalog State
//!
//! The catalog maps a resource name to its lazily-evaluated producer. It is
//! created once per process and shared by reference with every engine.

use super::helpers::{generated_resource_name, generated_resource_uri};
use super::models::{
    CatalogEvent, ContentProducer, ResourceContents, ResourceDescriptor, ResourceEntry,
    ResourceMetadata,
};
use crate::error::CatalogError;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, OwnedMutexGuard};

/// Capacity of the change-event channel. Slow subscribers skip ahead.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Shared handle to the catalog
pub type SharedCatalog = Arc<ResourceCatalog>;

/// Process-wide registry of readable resources.
pub struct ResourceCatalog {
    /// Entries keyed by resource name.
    entries: DashMap<String, ResourceEntry>,

    /// Sender side of the catalog-changed channel.
    changes: broadcast::Sender<CatalogEvent>,

    /// One lock per generated-resource slot, held while a document is
    /// persisted and registered.
    generation_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCatalog {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: DashMap::new(),
            changes,
            generation_locks: DashMap::new(),
        }
    }

    /// Registers a pre-supplied resource. Never notifies subscribers.
    pub fn register_static(
        &self,
        name: impl Into<String>,
        uri: impl Into<String>,
        metadata: ResourceMetadata,
        producer: Arc<dyn ContentProducer>,
    ) -> ResourceDescriptor {
        self.insert(ResourceEntry {
            name: name.into(),
            uri: uri.into(),
            metadata,
            producer,
        })
    }

    /// Registers a resource created at runtime and notifies every subscriber.
    ///
    /// Re-registering the same `name` replaces the previous producer. Names
    /// differing only in case share one slot (`GENERATED_JAN`); the latest
    /// registration wins and its URI is the only one that stays readable.
    pub fn register_dynamic(
        &self,
        name: &str,
        metadata: ResourceMetadata,
        producer: Arc<dyn ContentProducer>,
    ) -> ResourceDescriptor {
        let descriptor = self.restore_dynamic(name, metadata, producer);

        let event = CatalogEvent::ListChanged {
            uri: descriptor.uri.clone(),
        };
        match self.changes.send(event) {
            Ok(receivers) => {
                tracing::debug!(uri = %descriptor.uri, receivers, "catalog change broadcast")
            }
            Err(_) => tracing::debug!(uri = %descriptor.uri, "catalog changed with no subscribers"),
        }
        descriptor
    }

    /// Registers a generated resource found at startup, without notifying.
    pub fn restore_dynamic(
        &self,
        name: &str,
        metadata: ResourceMetadata,
        producer: Arc<dyn ContentProducer>,
    ) -> ResourceDescriptor {
        self.insert(ResourceEntry {
            name: generated_resource_name(name),
            uri: generated_resource_uri(name),
            metadata,
            producer,
        })
    }

    /// Locks the generated-resource slot `name` maps to.
    ///
    /// Writers of the same slot hold this across persisting and registering
    /// so the stored body and the registered producer always match.
    pub async fn lock_generated(&self, name: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .generation_locks
            .entry(generated_resource_name(name))
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Invokes the producer registered for `uri`.
    pub async fn read(&self, uri: &str) -> Result<ResourceContents, CatalogError> {
        // Clone out of the map so no shard lock is held across the await.
        let (mime_type, producer) = self
            .entries
            .iter()
            .find(|entry| entry.uri == uri)
            .map(|entry| (entry.metadata.mime_type.clone(), entry.producer.clone()))
            .ok_or_else(|| CatalogError::NotFound(uri.to_string()))?;

        let text = producer.produce().await.map_err(|source| CatalogError::Read {
            uri: uri.to_string(),
            source,
        })?;

        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type,
            text,
        })
    }

    /// All entries, ordered by name.
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        let mut descriptors: Vec<_> = self.entries.iter().map(|e| e.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribes to catalog-changed events.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.changes.subscribe()
    }

    fn insert(&self, entry: ResourceEntry) -> ResourceDescriptor {
        let descriptor = entry.descriptor();
        if self.entries.insert(entry.name.clone(), entry).is_some() {
            tracing::info!(name = %descriptor.name, "resource replaced");
        } else {
            tracing::info!(name = %descriptor.name, uri = %descriptor.uri, "resource registered");
        }
        descriptor
    }
}
