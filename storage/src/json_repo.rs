//! JSON repository: the whole table lives in one document on disk.
//!
//! Every operation reads the document, mutates it in memory and rewrites it while holding the
//! store's single lock. Rewrites go to a temporary sibling file that is renamed over the
//! document, so readers never see a half-written file.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::repository::{Repository, Update};

type Document = Map<String, Value>;

/// File-backed [`Repository`]: one JSON object mapping record id to record body.
pub struct JsonRepository<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Opens the document at `path`, creating the parent directory and an empty `{}` document
    /// if the file does not exist. Fails with [`StorageError::Corrupt`] if an existing file is
    /// not a JSON object.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        info!(path = %path.display(), "Opening JSON repository");

        let repo = Self {
            path,
            lock: Mutex::new(()),
            _marker: PhantomData,
        };
        repo.init().await?;
        Ok(repo)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn init(&self) -> Result<()> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        if exists {
            let document = self.read_document().await?;
            info!(
                path = %self.path.display(),
                records = document.len(),
                "JSON repository loaded"
            );
        } else {
            self.write_document(&Document::new()).await?;
            info!(path = %self.path.display(), "JSON repository created empty document");
        }
        Ok(())
    }

    async fn read_document(&self) -> Result<Document> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(other) => Err(self.corrupt(format!(
                "root must be an object, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(self.corrupt(e.to_string())),
        }
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        let payload = serde_json::to_vec_pretty(document)?;
        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        if let Err(e) = write_synced(&temp_path, &payload).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::io(&temp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::io(&self.path, e));
        }

        let dir = parent_dir(&self.path);
        sync_dir(dir).await.map_err(|e| StorageError::io(dir, e))?;

        debug!(
            path = %self.path.display(),
            records = document.len(),
            bytes = payload.len(),
            "JSON repository document written"
        );
        Ok(())
    }

    fn decode(&self, id: &str, value: Value) -> Result<T> {
        serde_json::from_value(value)
            .map_err(|e| self.corrupt(format!("record {:?} does not decode: {}", id, e)))
    }

    fn corrupt(&self, reason: String) -> StorageError {
        error!(path = %self.path.display(), reason = %reason, "JSON repository document is corrupt");
        StorageError::Corrupt {
            path: self.path.clone(),
            reason,
        }
    }
}

#[async_trait]
impl<T> Repository<T> for JsonRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<T>> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        match document.remove(id) {
            Some(value) => self.decode(id, value).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, entity))]
    async fn save(&self, id: &str, entity: T) -> Result<T> {
        let value = serde_json::to_value(&entity)?;

        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(id.to_string(), value);
        self.write_document(&document).await?;

        debug!(id = %id, "Saved record");
        Ok(entity)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.remove(id).is_none() {
            return Ok(false);
        }
        self.write_document(&document).await?;

        debug!(id = %id, "Deleted record");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        document
            .into_iter()
            .map(|(id, value)| self.decode(&id, value))
            .collect()
    }

    #[instrument(skip(self, f))]
    async fn update(&self, id: &str, f: Update<T>) -> Result<Option<T>> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        let current = match document.remove(id) {
            Some(value) => Some(self.decode(id, value)?),
            None => None,
        };

        let Some(next) = f(current) else {
            return Ok(None);
        };
        document.insert(id.to_string(), serde_json::to_value(&next)?);
        self.write_document(&document).await?;

        debug!(id = %id, "Updated record");
        Ok(Some(next))
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Flushes directory metadata; a rename is durable only once its directory is synced.
#[cfg(unix)]
pub(crate) async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
pub(crate) async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

async fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.sync_all().await?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
