//! Record store persisted to a JSON file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use docket_core::{DocketError, FormData, FromForm, Record, RecordId, RecordService, ServiceError, ServiceResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::memory_store::MemoryStore;

/// A [`MemoryStore`] whose contents are written back to a JSON array
/// after every mutation.
///
/// A missing file is an empty collection. Writes go to a sibling
/// temporary file first and are renamed into place.
pub struct JsonFileStore<R> {
    path: PathBuf,
    inner: MemoryStore<R>,
    write_lock: tokio::sync::Mutex<()>,
}

impl<R> JsonFileStore<R>
where
    R: Record + FromForm + Serialize + DeserializeOwned,
{
    /// Open the store at `path`, loading whatever it already holds
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DocketError> {
        let path = path.into();
        let records = read_records(&path).await?;
        tracing::debug!(path = %path.display(), count = records.len(), "opened json store");
        Ok(Self {
            path,
            inner: MemoryStore::with_records(records),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Reject duplicates of `field`, see [`MemoryStore::with_unique_field`]
    pub fn with_unique_field(mut self, field: impl Into<String>) -> Self {
        self.inner = self.inner.with_unique_field(field);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    async fn persist(&self) -> ServiceResult<()> {
        let records = self.inner.snapshot();
        write_records(&self.path, &records).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to write store");
            ServiceError::Transport(format!("Could not save {}: {}", self.path.display(), e))
        })
    }

    /// Run a mutation and write the result, restoring the previous
    /// contents if the write fails
    async fn mutate<T>(&self, op: impl FnOnce(&MemoryStore<R>) -> ServiceResult<T>) -> ServiceResult<T> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot();
        let value = op(&self.inner)?;
        if let Err(error) = self.persist().await {
            self.inner.replace(before);
            return Err(error);
        }
        Ok(value)
    }
}

async fn read_records<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>, DocketError> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_records<R: Serialize>(path: &Path, records: &[R]) -> Result<(), DocketError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl<R> RecordService<R> for JsonFileStore<R>
where
    R: Record + FromForm + Serialize + DeserializeOwned,
{
    /// Reloads the file so edits made by other processes are picked up
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_all(&self) -> ServiceResult<Vec<R>> {
        let _guard = self.write_lock.lock().await;
        let records: Vec<R> = read_records(&self.path).await.map_err(|e| match e {
            DocketError::Serialization(e) => {
                ServiceError::InvalidPayload(format!("{} is not a valid record file: {}", self.path.display(), e))
            }
            other => ServiceError::Transport(other.to_string()),
        })?;
        self.inner.replace(records.clone());
        Ok(records)
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn create(&self, payload: &FormData) -> ServiceResult<R> {
        self.mutate(|store| store.insert_from_form(payload)).await
    }

    #[tracing::instrument(skip(self, payload), fields(path = %self.path.display()))]
    async fn update(&self, id: &RecordId, payload: &FormData) -> ServiceResult<R> {
        self.mutate(|store| store.update_from_form(id, payload)).await
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        self.mutate(|store| store.remove(id)).await
    }
}
