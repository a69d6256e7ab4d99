//! In-memory record store

use async_trait::async_trait;
use docket_core::{FormData, FromForm, Record, RecordId, RecordService, ServiceError, ServiceResult};
use parking_lot::RwLock;

/// A `RecordService` backed by a vector behind a read/write lock.
///
/// Ids are allocated by the store (largest integer id + 1), the way a
/// database sequence would hand them out.
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
    unique_fields: Vec<String>,
}

impl<R: Record + FromForm> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record + FromForm> MemoryStore<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
            unique_fields: Vec::new(),
        }
    }

    /// Reject creates/updates that would duplicate `field` (compared
    /// case-insensitively, ignoring blanks)
    pub fn with_unique_field(mut self, field: impl Into<String>) -> Self {
        self.unique_fields.push(field.into());
        self
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of the current records
    pub fn snapshot(&self) -> Vec<R> {
        self.records.read().clone()
    }

    /// Replace the whole contents
    pub fn replace(&self, records: Vec<R>) {
        *self.records.write() = records;
    }

    pub fn insert_from_form(&self, payload: &FormData) -> ServiceResult<R> {
        let mut record = R::from_form(RecordId::UNASSIGNED, payload)?;
        let mut records = self.records.write();
        self.check_unique(&records, &record, None)?;

        let next = records
            .iter()
            .filter_map(|r| r.id().as_int())
            .max()
            .unwrap_or(0)
            .max(0)
            .checked_add(1)
            .ok_or_else(|| ServiceError::Rejected("No record ids are left in this collection".into()))?;
        record.set_id(RecordId::Int(next));
        records.push(record.clone());
        tracing::debug!(id = next, "record inserted");
        Ok(record)
    }

    pub fn update_from_form(&self, id: &RecordId, payload: &FormData) -> ServiceResult<R> {
        let record = R::from_form(id.clone(), payload)?;
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|r| &r.id() == id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        self.check_unique(&records, &record, Some(id))?;

        records[index] = record.clone();
        tracing::debug!(%id, "record updated");
        Ok(record)
    }

    pub fn remove(&self, id: &RecordId) -> ServiceResult<()> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| &r.id() != id);
        if records.len() == before {
            return Err(ServiceError::NotFound(id.clone()));
        }
        tracing::debug!(%id, "record removed");
        Ok(())
    }

    fn check_unique(&self, records: &[R], candidate: &R, skip: Option<&RecordId>) -> ServiceResult<()> {
        for field in &self.unique_fields {
            let value = candidate.field(field).to_string();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let clash = records
                .iter()
                .filter(|r| Some(&r.id()) != skip)
                .any(|r| r.field(field).to_string().trim().eq_ignore_ascii_case(value));
            if clash {
                return Err(ServiceError::Rejected(format!(
                    "A record with {} '{}' already exists",
                    field.replace('_', " "),
                    value
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record + FromForm> RecordService<R> for MemoryStore<R> {
    async fn fetch_all(&self) -> ServiceResult<Vec<R>> {
        Ok(self.snapshot())
    }

    async fn create(&self, payload: &FormData) -> ServiceResult<R> {
        self.insert_from_form(payload)
    }

    async fn update(&self, id: &RecordId, payload: &FormData) -> ServiceResult<R> {
        self.update_from_form(id, payload)
    }

    async fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        self.remove(id)
    }
}
