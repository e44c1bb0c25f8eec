//! Resource Catalog Module
//!
//! This module contains the process-wide registry of addressable documents:
//! - Catalog models (entries, metadata, producers, change events)
//! - Identifier derivation for static and generated resources
//! - The `ResourceCatalog` registry itself
//! - Startup population (quarterly reports, previously generated documents)

pub mod helpers;
pub mod models;
pub mod reports;
pub mod state;

// Re-export commonly used types for convenience
pub use models::{
    CatalogEvent, ContentProducer, DocumentProducer, ResourceContents, ResourceDescriptor,
    ResourceMetadata,
};
pub use state::ResourceCatalog;
