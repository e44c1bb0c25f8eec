//! Document store
//!
//! The catalog never touches the filesystem directly; it goes through the
//! `DocumentStore` trait so producers can be re-invoked on every read and
//! tests can swap in failing stores.

use super::helpers::{join_pages, paginate, render_pages};
use super::models::{DocumentMetadata, DocumentRef, GeneratedDocument, GeneratedSummary};
use crate::error::DocumentError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Extension used for stored document bodies.
const BODY_EXTENSION: &str = "txt";
/// Suffix used for the title/description sidecar.
const METADATA_SUFFIX: &str = ".meta.json";

/// Reads and writes knowledge-base documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a generated document. It must not be visible to readers
    /// until this returns `Ok`.
    async fn write_generated(&self, doc: &GeneratedDocument) -> Result<(), DocumentError>;

    /// Extracts the full text of a document, one `--- Page N ---` block per page.
    async fn extract_text(&self, doc: &DocumentRef) -> Result<String, DocumentError>;

    /// Lists previously generated documents.
    async fn list_generated(&self) -> Result<Vec<GeneratedSummary>, DocumentError>;
}

/// File-backed document store.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    /// Directory containing the pre-supplied reports
    resources_dir: PathBuf,

    /// Directory receiving generated documents
    generated_dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(resources_dir: impl Into<PathBuf>, generated_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            generated_dir: generated_dir.into(),
        }
    }

    /// Location of a document body on disk.
    pub fn path_for(&self, doc: &DocumentRef) -> PathBuf {
        match doc {
            DocumentRef::Report { quarter } => self
                .resources_dir
                .join(format!("etf_perspectives_2025_q{}.{}", quarter, BODY_EXTENSION)),
            DocumentRef::Generated { name } => self
                .generated_dir
                .join(format!("{}.{}", name, BODY_EXTENSION)),
        }
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.generated_dir
            .join(format!("{}{}", name, METADATA_SUFFIX))
    }

    async fn ensure_generated_dir(&self) -> Result<(), DocumentError> {
        tokio::fs::create_dir_all(&self.generated_dir)
            .await
            .map_err(|source| io_error(&self.generated_dir, source))
    }

    async fn read_title(&self, name: &str) -> Option<String> {
        let path = self.metadata_path(name);
        let raw = tokio::fs::read(&path).await.ok()?;
        match serde_json::from_slice::<DocumentMetadata>(&raw) {
            Ok(meta) => Some(meta.title),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed document metadata");
                None
            }
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn write_generated(&self, doc: &GeneratedDocument) -> Result<(), DocumentError> {
        self.ensure_generated_dir().await?;

        let meta_path = self.metadata_path(&doc.name);
        let meta = DocumentMetadata {
            title: doc.title.clone(),
            description: doc.description.clone(),
        };
        let meta_bytes = serde_json::to_vec_pretty(&meta).map_err(|source| {
            DocumentError::Metadata {
                path: meta_path.display().to_string(),
                source,
            }
        })?;
        write_atomically(&meta_path, &meta_bytes).await?;

        // Body last: a document is listed only once its body exists.
        let body = join_pages(&paginate(&doc.contents));
        let body_path = self.path_for(&DocumentRef::Generated {
            name: doc.name.clone(),
        });
        write_atomically(&body_path, body.as_bytes()).await?;

        tracing::debug!(path = %body_path.display(), "generated document written");
        Ok(())
    }

    async fn extract_text(&self, doc: &DocumentRef) -> Result<String, DocumentError> {
        let path = self.path_for(doc);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DocumentError::NotFound(path.display().to_string())
            } else {
                io_error(&path, source)
            }
        })?;
        Ok(render_pages(&raw))
    }

    async fn list_generated(&self) -> Result<Vec<GeneratedSummary>, DocumentError> {
        self.ensure_generated_dir().await?;

        let mut entries = tokio::fs::read_dir(&self.generated_dir)
            .await
            .map_err(|source| io_error(&self.generated_dir, source))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error(&self.generated_dir, source))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            let path = entry.path();
            if !is_file || path.extension().and_then(|e| e.to_str()) != Some(BODY_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let title = self.read_title(&name).await;
            summaries.push(GeneratedSummary { name, title });
        }
        Ok(summaries)
    }
}

/// Writes to a temporary sibling and renames it over `path`.
///
/// Every call gets its own temporary name, so concurrent writers of the same
/// path never share a partially written file.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|source| io_error(&tmp, source))?;
    if let Err(source) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error(path, source));
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> DocumentError {
    DocumentError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FsDocumentStore {
        FsDocumentStore::new(dir.path().join("resources"), dir.path().join("generated"))
    }

    fn doc(name: &str, contents: &str) -> GeneratedDocument {
        GeneratedDocument {
            name: name.into(),
            title: "January Report".into(),
            contents: contents.into(),
            description: Some("Monthly numbers".into()),
        }
    }

    #[tokio::test]
    async fn write_then_extract_generated() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.write_generated(&doc("jan-report", "Hello")).await.unwrap();

        let text = store
            .extract_text(&DocumentRef::Generated {
                name: "jan-report".into(),
            })
            .await
            .unwrap();
        assert_eq!(text, "--- Page 1 ---\nHello\n\n");
    }

    #[tokio::test]
    async fn rewriting_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let target = DocumentRef::Generated { name: "q1".into() };

        store.write_generated(&doc("q1", "old")).await.unwrap();
        store.write_generated(&doc("q1", "new")).await.unwrap();

        let text = store.extract_text(&target).await.unwrap();
        assert!(text.contains("new"));
        assert!(!text.contains("old"));
    }

    #[tokio::test]
    async fn missing_report_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir)
            .extract_text(&DocumentRef::Report { quarter: 3 })
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_generated_creates_dir_and_reads_titles() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.list_generated().await.unwrap().is_empty());
        assert!(dir.path().join("generated").is_dir());

        store.write_generated(&doc("b-doc", "two")).await.unwrap();
        store.write_generated(&doc("a-doc", "one")).await.unwrap();
        std::fs::write(dir.path().join("generated").join("notes.md"), "x").unwrap();

        let listed = store.list_generated().await.unwrap();
        let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a-doc", "b-doc"]);
        assert_eq!(listed[0].title.as_deref(), Some("January Report"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_of_same_name_all_succeed() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store(&dir));
        let contents = ["alpha", "beta", "gamma", "delta"];

        for _ in 0..8 {
            let writes: Vec<_> = contents
                .iter()
                .map(|contents| {
                    let store = store.clone();
                    let doc = doc("shared", contents);
                    tokio::spawn(async move { store.write_generated(&doc).await })
                })
                .collect();
            for write in writes {
                write.await.unwrap().unwrap();
            }
        }

        let text = store
            .extract_text(&DocumentRef::Generated {
                name: "shared".into(),
            })
            .await
            .unwrap();
        assert!(contents.iter().any(|c| text == format!("--- Page 1 ---\n{}\n\n", c)));

        let leftovers = std::fs::read_dir(dir.path().join("generated"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
