//! Document Store Module
//!
//! This module contains the boundary to the on-disk document collaborator:
//! - Document models (references, generated documents, summaries)
//! - Page rendering and pagination helpers
//! - The `DocumentStore` trait and its file-backed implementation

pub mod helpers;
pub mod models;
pub mod store;

// Re-export commonly used types for convenience
pub use models::{DocumentRef, GeneratedDocument, GeneratedSummary};
pub use store::{DocumentStore, FsDocumentStore};
