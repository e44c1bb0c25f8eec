//! Tool declarations and execution
//!
//! Every tool is a variant of [`Tool`]: its name, input contract and handler
//! are declared together and looked up by name when a `tools/call` arrives.

use crate::catalog::reports::generated_metadata;
use crate::catalog::state::SharedCatalog;
use crate::catalog::DocumentProducer;
use crate::documents::{DocumentRef, DocumentStore, GeneratedDocument};
use crate::error::ToolError;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};

/// Name of the document creation tool
pub const ADD_GENERATED_RESOURCE: &str = "add-generated-resource";
/// Longest accepted file name, without extension
pub const MAX_NAME_LEN: usize = 80;

/// What a tool needs from the rest of the server.
#[derive(Clone)]
pub struct ToolContext {
    pub catalog: SharedCatalog,
    pub store: Arc<dyn DocumentStore>,
}

/// Declared tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    AddGeneratedResource,
}

impl Tool {
    pub const ALL: [Tool; 1] = [Tool::AddGeneratedResource];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::AddGeneratedResource => ADD_GENERATED_RESOURCE,
        }
    }

    /// Entry for `tools/list`.
    pub fn definition(self) -> Value {
        match self {
            Tool::AddGeneratedResource => json!({
                "name": ADD_GENERATED_RESOURCE,
                "title": "Add generated resource",
                "description": "Adds a generated resource - such as a summary or analysis requested by the user - to the MCP server. \
                    This enables saving generated results for later use, made accessible as new MCP resources. \
                    The tool will take care of formatting the text in a generated PDF.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "contents": {
                            "type": "string",
                            "description": "The raw text contents of the generated resource."
                        },
                        "title": {
                            "type": "string",
                            "description": "The title of the generated resource."
                        },
                        "description": {
                            "type": ["string", "null"],
                            "description": "An optional description of the generated resource."
                        },
                        "name": {
                            "type": "string",
                            "maxLength": MAX_NAME_LEN,
                            "description": "The file-name of the generated resource, without an extension."
                        }
                    },
                    "required": ["contents", "title", "name"],
                    "additionalProperties": false
                },
                "outputSchema": {
                    "type": "object",
                    "properties": {
                        "success": {
                            "type": "boolean",
                            "description": "Whether resource is successfully saved"
                        }
                    },
                    "required": ["success"]
                }
            }),
        }
    }

    /// Runs the tool. Input contract violations are errors; everything that
    /// goes wrong after validation is reported as a failed [`ToolOutcome`].
    pub async fn call(self, ctx: &ToolContext, args: Value) -> Result<ToolOutcome, ToolError> {
        match self {
            Tool::AddGeneratedResource => {
                let input: AddGeneratedResourceInput = serde_json::from_value(args)
                    .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
                input.validate()?;
                Ok(add_generated_resource(ctx, input).await)
            }
        }
    }
}

/// Arguments of `add-generated-resource`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddGeneratedResourceInput {
    pub contents: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub name: String,
}

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("file name pattern is valid")
    })
}

impl AddGeneratedResourceInput {
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(ToolError::InvalidArguments(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if !file_name_pattern().is_match(&self.name) {
            return Err(ToolError::InvalidArguments(format!(
                "name {:?} is not a valid file name",
                self.name
            )));
        }
        Ok(())
    }
}

/// Outcome of a tool call, shaped for the `tools/call` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
}

impl ToolOutcome {
    pub fn to_value(&self) -> Value {
        let text = if self.success {
            "successful"
        } else {
            "unsuccessful"
        };
        json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": { "success": self.success },
            "isError": !self.success,
        })
    }
}

/// Persists the document, then publishes it in the catalog.
///
/// Calls for the same slot run one at a time, so the last document written
/// is also the one registered.
async fn add_generated_resource(ctx: &ToolContext, input: AddGeneratedResourceInput) -> ToolOutcome {
    let AddGeneratedResourceInput {
        contents,
        title,
        description,
        name,
    } = input;

    let _slot = ctx.catalog.lock_generated(&name).await;
    let document = GeneratedDocument {
        name: name.clone(),
        title: title.clone(),
        contents,
        description,
    };
    if let Err(e) = ctx.store.write_generated(&document).await {
        tracing::warn!(name = %name, error = %e, "failed to persist generated resource");
        return ToolOutcome { success: false };
    }

    let producer = DocumentProducer::new(
        ctx.store.clone(),
        DocumentRef::Generated { name: name.clone() },
    );
    let descriptor = ctx.catalog.register_dynamic(
        &name,
        generated_metadata(&name, Some(title)),
        Arc::new(producer),
    );
    tracing::info!(uri = %descriptor.uri, "generated resource published");

    ToolOutcome { success: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceCatalog;
    use crate::documents::{FsDocumentStore, GeneratedSummary};
    use crate::error::DocumentError;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct ReadOnlyStore;

    #[async_trait]
    impl DocumentStore for ReadOnlyStore {
        async fn write_generated(&self, doc: &GeneratedDocument) -> Result<(), DocumentError> {
            Err(DocumentError::Io {
                path: doc.name.clone(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        async fn extract_text(&self, doc: &DocumentRef) -> Result<String, DocumentError> {
            Err(DocumentError::NotFound(format!("{:?}", doc)))
        }

        async fn list_generated(&self) -> Result<Vec<GeneratedSummary>, DocumentError> {
            Ok(Vec::new())
        }
    }

    fn args(name: &str) -> Value {
        json!({ "name": name, "title": "January Report", "contents": "Hello" })
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(
            Tool::from_name("add-generated-resource"),
            Some(Tool::AddGeneratedResource)
        );
        assert_eq!(Tool::from_name("delete-everything"), None);
    }

    #[tokio::test]
    async fn successful_call_registers_resource() {
        let dir = TempDir::new().unwrap();
        let ctx = ToolContext {
            catalog: Arc::new(ResourceCatalog::new()),
            store: Arc::new(FsDocumentStore::new(dir.path(), dir.path().join("generated"))),
        };

        let outcome = Tool::AddGeneratedResource
            .call(&ctx, args("jan-report"))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.to_value()["structuredContent"]["success"], true);
        let read = ctx
            .catalog
            .read("file:///generated/jan-report.pdf")
            .await
            .unwrap();
        assert!(read.text.starts_with("--- Page 1 ---\nHello"));
    }

    #[tokio::test]
    async fn persistence_failure_leaves_catalog_untouched() {
        let ctx = ToolContext {
            catalog: Arc::new(ResourceCatalog::new()),
            store: Arc::new(ReadOnlyStore),
        };
        let mut rx = ctx.catalog.subscribe();

        let outcome = Tool::AddGeneratedResource
            .call(&ctx, args("jan-report"))
            .await
            .unwrap();

        assert!(!outcome.success);
        let value = outcome.to_value();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], "unsuccessful");
        assert!(ctx.catalog.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn invalid_names_are_rejected() {
        let ctx = ToolContext {
            catalog: Arc::new(ResourceCatalog::new()),
            store: Arc::new(ReadOnlyStore),
        };

        let too_long = "x".repeat(81);
        for name in ["", "../escape", "a/b", ".hidden", too_long.as_str()] {
            let err = Tool::AddGeneratedResource
                .call(&ctx, args(name))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)), "{}", name);
        }

        let missing_title = json!({ "name": "ok", "contents": "Hello" });
        assert!(Tool::AddGeneratedResource
            .call(&ctx, missing_title)
            .await
            .is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_calls_for_one_name_all_succeed() {
        let dir = TempDir::new().unwrap();
        let ctx = ToolContext {
            catalog: Arc::new(ResourceCatalog::new()),
            store: Arc::new(FsDocumentStore::new(dir.path(), dir.path().join("generated"))),
        };
        let contents = ["alpha", "beta", "gamma", "delta"];

        let calls: Vec<_> = contents
            .iter()
            .map(|contents| {
                let ctx = ctx.clone();
                let args = json!({ "name": "shared", "title": "Shared", "contents": contents });
                tokio::spawn(async move { Tool::AddGeneratedResource.call(&ctx, args).await })
            })
            .collect();
        for call in calls {
            assert!(call.await.unwrap().unwrap().success);
        }

        assert_eq!(ctx.catalog.len(), 1);
        let read = ctx
            .catalog
            .read("file:///generated/shared.pdf")
            .await
            .unwrap();
        assert!(contents
            .iter()
            .any(|c| read.text == format!("--- Page 1 ---\n{}\n\n", c)));
    }
}
