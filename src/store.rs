use crate::error::StoreError;
use async_trait::async_trait;

/// Store interface for join relations between two records.
///
/// Detectors call this from pending decisions, for example to count the
/// rows linking a user to a post. The ability itself never talks to a store.
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Returns how many `relation` rows link `left` to `right`.
    async fn count(
        &self,
        relation: &str,
        left: &str,
        right: &str,
    ) -> std::result::Result<u64, StoreError>;
}
