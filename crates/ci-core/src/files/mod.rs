//! File stage rules: entries, statuses and the size ceiling.

mod uploaded_file;

use bytes::Bytes;

pub use uploaded_file::{UploadStatus, UploadedFile};

/// Default upload ceiling: 20 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// A file the user picked, with its content already read.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Size ceiling check applied before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSizePolicy {
    pub max_file_size: u64,
}

impl FileSizePolicy {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn exceeds(&self, size: u64) -> bool {
        size > self.max_file_size
    }

    /// Create the optimistic entry for a selected file.
    pub fn admit(&self, file: &SelectedFile) -> UploadedFile {
        if self.exceeds(file.size()) {
            UploadedFile::oversized(file.name.clone(), file.size())
        } else {
            UploadedFile::pending(file.name.clone(), file.size())
        }
    }
}

impl Default for FileSizePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}
