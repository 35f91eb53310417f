use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use crate::store::RelationStore;

/// In-memory relation store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryRelationStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: RwLock<HashMap<RowKey, u64>>,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct RowKey {
    relation: String,
    left: String,
    right: String,
}

impl RowKey {
    fn new(relation: &str, left: &str, right: &str) -> Self {
        Self {
            relation: relation.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

impl MemoryRelationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `relation` row linking `left` to `right`.
    pub fn link(&self, relation: &str, left: &str, right: &str) {
        let mut guard = self.inner.rows.write().expect("poisoned lock");
        *guard.entry(RowKey::new(relation, left, right)).or_default() += 1;
    }

    /// Removes every `relation` row linking `left` to `right`.
    pub fn unlink(&self, relation: &str, left: &str, right: &str) {
        let mut guard = self.inner.rows.write().expect("poisoned lock");
        guard.remove(&RowKey::new(relation, left, right));
    }
}

#[async_trait]
impl RelationStore for MemoryRelationStore {
    async fn count(
        &self,
        relation: &str,
        left: &str,
        right: &str,
    ) -> std::result::Result<u64, crate::StoreError> {
        let guard = self.inner.rows.read().expect("poisoned lock");
        Ok(guard
            .get(&RowKey::new(relation, left, right))
            .copied()
            .unwrap_or(0))
    }
}
