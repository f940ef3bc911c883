//! Directory-backed document store with atomic writes.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── <collection>/
//!     ├── <key-1>.json
//!     └── <key-2>.json
//! ```
//!
//! Each document is written to a uniquely named temporary file in the same
//! directory, fsynced, and renamed over the target, so a reader never sees a
//! partially written document.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use taskrec_core::{
    Document, DocumentStore,
    error::{Result, TaskrecError},
    key::{sanitize_key, validate_collection},
};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const DOCUMENT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// Stores each document as one JSON file under `base_dir/<collection>/`.
#[derive(Debug, Clone)]
pub struct DirDocumentStore {
    base_dir: PathBuf,
}

impl DirDocumentStore {
    /// Creates a store rooted at `base_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await.map_err(|e| {
            TaskrecError::io(format!(
                "Failed to create store directory {}: {}",
                base_dir.display(),
                e
            ))
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding one collection. Never resolves outside `base_dir`.
    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        validate_collection(collection)?;
        Ok(self.base_dir.join(&*sanitize_key(collection)))
    }

    fn document_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{}.{}", key, DOCUMENT_EXTENSION))
    }

    /// Reads and parses one document file. `Ok(None)` if the file is gone.
    async fn read_document(path: &Path, key: &str) -> Result<Option<Document>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => Ok(Some(document)),
            Ok(_) => Err(TaskrecError::invalid_document(
                key,
                "stored value is not a JSON object",
            )),
            Err(e) => Err(TaskrecError::invalid_document(key, e.to_string())),
        }
    }
}

#[async_trait]
impl DocumentStore for DirDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let dir = self.collection_dir(collection)?;
        // An empty key is never written, so there is nothing to find
        if key.is_empty() {
            return Ok(None);
        }
        Self::read_document(&Self::document_path(&dir, key), key).await
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Document>> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match path.extension().and_then(|ext| ext.to_str()) {
                Some(DOCUMENT_EXTENSION) => {}
                Some(TEMP_EXTENSION) => continue,
                _ => {
                    tracing::warn!(path = %path.display(), "skipping non-document file");
                    continue;
                }
            }

            let key = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            // Removed between listing and reading
            if let Some(document) = Self::read_document(&path, &key).await? {
                documents.push(document);
            }
        }

        Ok(documents)
    }

    async fn set(&self, collection: &str, key: &str, document: &Document) -> Result<()> {
        let dir = self.collection_dir(collection)?;
        if key.is_empty() {
            return Err(TaskrecError::data_access("Document key must not be empty"));
        }
        let path = Self::document_path(&dir, key);
        fs::create_dir_all(&dir).await?;

        let bytes = serde_json::to_vec_pretty(document)?;

        let tmp_path = dir.join(format!(".{}.{}.{}", key, Uuid::new_v4(), TEMP_EXTENSION));
        let write_result = async {
            let mut tmp_file = fs::File::create(&tmp_path).await?;
            tmp_file.write_all(&bytes).await?;
            tmp_file.sync_all().await?;
            drop(tmp_file);
            fs::rename(&tmp_path, &path).await
        }
        .await;

        if let Err(e) = write_result {
            // Best effort; the temp file is ignored by readers anyway.
            let _ = fs::remove_file(&tmp_path).await;
            return Err(TaskrecError::io(format!(
                "Failed to write document {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let dir = self.collection_dir(collection)?;
        if key.is_empty() {
            return Ok(());
        }
        match fs::remove_file(Self::document_path(&dir, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_all(&self, collection: &str) -> Result<()> {
        match fs::remove_dir_all(self.collection_dir(collection)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
