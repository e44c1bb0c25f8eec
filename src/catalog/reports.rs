//! Startup population of the catalog
//!
//! Registers the quarterly reports and every document generated during a
//! previous run of the server.

use super::helpers::{report_resource_name, report_resource_uri, DOCUMENT_MIME_TYPE};
use super::models::{DocumentProducer, ResourceMetadata};
use super::state::ResourceCatalog;
use crate::documents::{DocumentRef, DocumentStore};
use crate::error::DocumentError;
use std::sync::Arc;

/// Quarters covered by the pre-supplied reports.
pub const REPORT_QUARTERS: [u8; 4] = [1, 2, 3, 4];

/// Metadata of a quarterly report.
pub fn report_metadata(quarter: u8) -> ResourceMetadata {
    ResourceMetadata {
        title: None,
        description: format!(
            "Retrieves the PDF Report of Vanguard's ETF Perspective for 2025 Quarter {}.",
            quarter
        ),
        mime_type: DOCUMENT_MIME_TYPE.to_string(),
    }
}

/// Metadata of a generated document.
pub fn generated_metadata(name: &str, title: Option<String>) -> ResourceMetadata {
    ResourceMetadata {
        title,
        description: format!("Generated PDF Report {}.", name),
        mime_type: DOCUMENT_MIME_TYPE.to_string(),
    }
}

/// Registers the quarterly reports and restores generated documents.
///
/// Report files are not checked here; a missing report surfaces as a read
/// error when a client asks for it.
pub async fn populate(
    catalog: &ResourceCatalog,
    store: Arc<dyn DocumentStore>,
) -> Result<(), DocumentError> {
    for quarter in REPORT_QUARTERS {
        catalog.register_static(
            report_resource_name(quarter),
            report_resource_uri(quarter),
            report_metadata(quarter),
            Arc::new(DocumentProducer::new(
                store.clone(),
                DocumentRef::Report { quarter },
            )),
        );
    }

    let generated = store.list_generated().await?;
    let restored = generated.len();
    for summary in generated {
        let producer = DocumentProducer::new(
            store.clone(),
            DocumentRef::Generated {
                name: summary.name.clone(),
            },
        );
        catalog.restore_dynamic(
            &summary.name,
            generated_metadata(&summary.name, summary.title),
            Arc::new(producer),
        );
    }

    tracing::info!(
        reports = REPORT_QUARTERS.len(),
        restored,
        "resource catalog populated"
    );
    Ok(())
}
