use crate::push::{PushRecord, select_recent};

use std::collections::BTreeMap;

use tracing::trace;

/// In-memory push collection keyed by push id.
///
/// Owned by a single writer (the pipeline actor), so the "is it new" check
/// and the write happen without interleaving.
#[derive(Debug, Default)]
pub struct PushStore {
    pushes: BTreeMap<String, PushRecord>,
}

impl PushStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under `id` and report whether `id` was unseen.
    ///
    /// The record is always written, so a known id is updated in place.
    /// The returned flag reflects the state before the write.
    pub fn insert_or_update(&mut self, id: impl Into<String>, record: PushRecord) -> bool {
        let id = id.into();
        let is_new = self.pushes.insert(id.clone(), record).is_none();
        trace!(push_id = %id, is_new, "Push stored");
        is_new
    }

    /// Look up a push by id.
    pub fn get(&self, id: &str) -> Option<&PushRecord> {
        self.pushes.get(id)
    }

    /// Number of stored pushes.
    pub fn len(&self) -> usize {
        self.pushes.len()
    }

    /// Whether the store holds no pushes.
    pub fn is_empty(&self) -> bool {
        self.pushes.is_empty()
    }

    /// The `limit` most recently created active pushes, oldest first.
    pub fn select_recent(&self, limit: usize) -> Vec<PushRecord> {
        select_recent(self.pushes.values(), limit)
    }
}
