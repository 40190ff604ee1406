//! File-backed snapshot store
//!
//! One JSON file per key under a directory. The password field of a
//! snapshot is never written by the session bridge, so nothing secret
//! reaches the disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use ci_core::ports::SnapshotStorePort;
use ci_core::session::SnapshotKey;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";

/// `<data dir>/consult-intake/snapshots`, when the platform has a data dir.
pub fn default_snapshot_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("consult-intake").join(DEFAULT_SNAPSHOT_DIR))
}

pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key.as_str())))
    }
}

/// Keys contain `@` and `.`; anything outside a conservative set is escaped
/// so the key maps to a single file name on every platform.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '@' | '+' => c.to_string(),
            other => format!("%{:02X}", other as u32),
        })
        .collect()
}

#[async_trait]
impl SnapshotStorePort for FileSnapshotStore {
    async fn load(&self, key: &SnapshotKey) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn save(&self, key: &SnapshotKey, value: String) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(key);
        let mut file = fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create snapshot file {}", path.display()))?;
        file.write_all(value.as_bytes())
            .await
            .context("Failed to write snapshot file")?;
        file.sync_all().await.context("Failed to sync snapshot file")?;
        Ok(())
    }

    async fn remove(&self, key: &SnapshotKey) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
