use serde::{Deserialize, Serialize};

use crate::ids::FileId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Uploaded,
    /// Larger than the configured ceiling; never sent.
    Oversized,
    Failed { reason: String },
}

/// One selected file, mutated in place as its upload progresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    pub url: Option<String>,
    pub public_id: Option<String>,
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub status: UploadStatus,
}

impl UploadedFile {
    pub fn pending(name: impl Into<String>, size: u64) -> Self {
        Self {
            id: FileId::new(),
            name: name.into(),
            size,
            url: None,
            public_id: None,
            progress: 0,
            status: UploadStatus::Pending,
        }
    }

    pub fn oversized(name: impl Into<String>, size: u64) -> Self {
        Self {
            status: UploadStatus::Oversized,
            ..Self::pending(name, size)
        }
    }

    pub fn is_oversized(&self) -> bool {
        matches!(self.status, UploadStatus::Oversized)
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self.status, UploadStatus::Uploaded)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.status, UploadStatus::Pending | UploadStatus::Uploading)
    }

    /// Record transfer progress. Ignored once the entry left the in-flight states.
    pub fn record_progress(&mut self, sent: u64, total: u64) {
        if !self.is_in_flight() {
            return;
        }
        self.status = UploadStatus::Uploading;
        self.progress = percent(sent, total);
    }

    pub fn mark_uploaded(&mut self, url: String, public_id: Option<String>) {
        self.url = Some(url);
        self.public_id = public_id;
        self.progress = 100;
        self.status = UploadStatus::Uploaded;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = UploadStatus::Failed {
            reason: reason.into(),
        };
    }
}

fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent * 100) / total) as u8
}
