use async_trait::async_trait;

use crate::session::SnapshotKey;

/// Transient key/value storage for session snapshots.
///
/// Values are raw JSON; decoding is the session bridge's job so that a
/// corrupt entry can be treated as absent.
#[async_trait]
pub trait SnapshotStorePort: Send + Sync {
    async fn load(&self, key: &SnapshotKey) -> anyhow::Result<Option<String>>;
    async fn save(&self, key: &SnapshotKey, value: String) -> anyhow::Result<()>;
    async fn remove(&self, key: &SnapshotKey) -> anyhow::Result<()>;
}
