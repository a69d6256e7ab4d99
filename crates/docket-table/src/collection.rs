use docket_core::{Record, RecordId};

/// The records a view owns, in insertion order.
///
/// Nothing below the owning view keeps record state: mutations arrive
/// here as create/update/delete reconciliations after the service call
/// has completed.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Borrowed view used as input to the filter/search/sort pipeline
    pub fn refs(&self) -> Vec<&R> {
        self.records.iter().collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|record| &record.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// One past the largest integer id (1 for an empty collection).
    ///
    /// `None` once the largest id is `i64::MAX`.
    pub fn next_id(&self) -> Option<RecordId> {
        let max = self
            .records
            .iter()
            .filter_map(|record| record.id().as_int())
            .max()
            .unwrap_or(0);
        max.max(0).checked_add(1).map(RecordId::Int)
    }

    /// Append a newly created record exactly once.
    ///
    /// The returned record keeps its id unless the id is unassigned or
    /// already taken, in which case it receives `next_id()`. When the id
    /// space is exhausted the returned id is kept as is.
    pub fn on_create(&mut self, mut record: R) -> RecordId {
        let id = record.id();
        if id.is_unassigned() || self.contains(&id) {
            match self.next_id() {
                Some(assigned) => {
                    tracing::debug!(returned = %id, assigned = %assigned, "assigning id to created record");
                    record.set_id(assigned);
                }
                None => tracing::warn!(returned = %id, "no integer id left to assign"),
            }
        }
        let id = record.id();
        self.records.push(record);
        id
    }

    /// Replace the record with the same id; returns false when no record
    /// matched (the collection may be stale)
    pub fn on_update(&mut self, record: R) -> bool {
        let id = record.id();
        match self.records.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                tracing::warn!(id = %id, "updated record is not in the collection");
                false
            }
        }
    }

    /// Remove the record with `id`; returns whether anything was removed
    pub fn on_delete(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| &record.id() != id);
        before != self.records.len()
    }

    /// Swap in a freshly fetched collection
    pub fn replace_all(&mut self, records: Vec<R>) {
        self.records = records;
    }
}

impl<R: Record> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
