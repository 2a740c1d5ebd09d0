use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Where guidance documents come from.
///
/// Absence is the normal "not configured" case, so implementations report it
/// as `None` rather than an error.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self, path: &str) -> Option<String>;
}

/// Reads documents relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn fetch_document(&self, path: &str) -> Option<String> {
        let full_path = self.root.join(path);
        match tokio::fs::read_to_string(&full_path).await {
            Ok(contents) if !contents.trim().is_empty() => Some(contents),
            Ok(_) => {
                debug!(path = %full_path.display(), "guidance document is empty");
                None
            }
            Err(err) => {
                debug!(path = %full_path.display(), error = %err, "guidance document unavailable");
                None
            }
        }
    }
}

/// In-memory documents keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSource {
    documents: HashMap<String, String>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, contents: &str) -> Self {
        self.documents.insert(path.to_string(), contents.to_string());
        self
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn fetch_document(&self, path: &str) -> Option<String> {
        self.documents
            .get(path)
            .filter(|contents| !contents.trim().is_empty())
            .cloned()
    }
}
