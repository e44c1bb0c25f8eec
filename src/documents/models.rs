//! Document Models
//!
//! Data structures exchanged with the document store.

use serde::{Deserialize, Serialize};

/// Points at a readable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRef {
    /// One of the pre-supplied quarterly reports
    Report {
        /// Quarter number, 1 through 4
        quarter: u8,
    },
    /// A document created at runtime by a tool call
    Generated {
        /// File-safe name without extension
        name: String,
    },
}

/// A document to be persisted by a creation tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    /// File-safe name without extension
    pub name: String,

    /// Title printed at the top of the document
    pub title: String,

    /// Raw text body
    pub contents: String,

    /// Optional subtitle shown under the title
    pub description: Option<String>,
}

/// Title and description stored next to a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A previously generated document discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSummary {
    /// File-safe name without extension
    pub name: String,

    /// Stored title, when the sidecar is present and readable
    pub title: Option<String>,
}
