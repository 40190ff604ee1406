use std::collections::HashMap;

use async_trait::async_trait;
use ci_core::ports::SnapshotStorePort;
use ci_core::session::SnapshotKey;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySnapshotStore {
    entries: RwLock<HashMap<SnapshotKey, String>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStorePort for InMemorySnapshotStore {
    async fn load(&self, key: &SnapshotKey) -> anyhow::Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &SnapshotKey, value: String) -> anyhow::Result<()> {
        self.entries.write().await.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &SnapshotKey) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
