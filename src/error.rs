//! Error types for the knowledge-base server
//!
//! Each concern gets its own `thiserror` enum so callers can tell a missing
//! resource from an unreadable one, or a duplicate session from an unknown
//! one, without string matching.

use thiserror::Error;

/// Failures of the document store collaborator.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The requested document does not exist on disk
    #[error("document not found: {0}")]
    NotFound(String),

    /// Reading or writing the backing file failed
    #[error("document I/O failed for {path}: {source}")]
    Io {
        /// Path that was being accessed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The title/description sidecar could not be encoded or decoded
    #[error("document metadata is malformed for {path}: {source}")]
    Metadata {
        /// Path of the sidecar file
        path: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the resource catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No entry is registered under the requested URI
    #[error("Resource {0} not found")]
    NotFound(String),

    /// The entry exists but its producer failed
    #[error("failed to read resource {uri}: {source}")]
    Read {
        /// URI that was being read
        uri: String,
        /// Producer failure
        #[source]
        source: DocumentError,
    },
}

/// Failures of the session registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A live session is already registered under this identifier
    #[error("session {0} already exists")]
    Duplicate(String),

    /// No live session is registered under this identifier
    #[error("session {0} not found")]
    NotFound(String),
}

/// Failures while executing a tool call.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The requested tool is not declared
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not satisfy the tool's input contract
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
