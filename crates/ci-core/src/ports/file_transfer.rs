use std::sync::Arc;

use async_trait::async_trait;

use crate::files::SelectedFile;
use crate::ports::errors::ApiError;

/// Called with `(bytes_sent, total_bytes)` as the upload body is consumed.
pub type UploadProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub url: String,
    pub public_id: Option<String>,
}

#[async_trait]
pub trait FileTransferPort: Send + Sync {
    async fn upload(
        &self,
        file: SelectedFile,
        progress: UploadProgressFn,
    ) -> Result<UploadReceipt, ApiError>;

    async fn delete(&self, public_id: &str) -> Result<(), ApiError>;
}
