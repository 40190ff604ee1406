use async_trait::async_trait;
use bytes::Bytes;
use ci_core::files::SelectedFile;
use ci_core::ports::{ApiError, FileTransferPort, UploadProgressFn, UploadReceipt};
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, instrument};

use super::client::{decode, HttpIntakeClient};
use super::dto::{Ack, DeleteFileBody, UploadResponse};
use super::error::map_reqwest_error;

const UPLOAD_PATH: &str = "file/upload";
const DELETE_PATH: &str = "file/delete";
const UPLOAD_FIELD: &str = "file";

/// Size of the slices the upload body is streamed in; progress is reported
/// once per slice.
const CHUNK_SIZE: usize = 64 * 1024;

/// Wrap `content` in a body that reports `(sent, total)` as reqwest consumes it.
fn progress_body(content: Bytes, progress: UploadProgressFn) -> Body {
    let total = content.len() as u64;
    let chunks: Vec<Bytes> = (0..content.len())
        .step_by(CHUNK_SIZE)
        .map(|start| content.slice(start..(start + CHUNK_SIZE).min(content.len())))
        .collect();

    let mut sent = 0u64;
    let stream = stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress(sent, total);
        Ok::<Bytes, std::io::Error>(chunk)
    });
    Body::wrap_stream(stream)
}

#[async_trait]
impl FileTransferPort for HttpIntakeClient {
    #[instrument(skip_all, fields(file = %file.name, size = file.size()), err)]
    async fn upload(
        &self,
        file: SelectedFile,
        progress: UploadProgressFn,
    ) -> Result<UploadReceipt, ApiError> {
        let size = file.size();
        let mut part = Part::stream_with_length(progress_body(file.content, progress), size)
            .file_name(file.name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| ApiError::Network(format!("invalid content type: {e}")))?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response: UploadResponse = decode(response).await?;

        match (response.success, response.url) {
            (true, Some(url)) => {
                debug!(%url, "upload stored");
                Ok(UploadReceipt {
                    url,
                    public_id: response.public_id,
                })
            }
            (true, None) => Err(ApiError::Decode("upload response has no url".into())),
            (false, _) => Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "upload was not accepted".to_string()),
            )),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, public_id: &str) -> Result<(), ApiError> {
        let ack: Ack = self
            .post_json(DELETE_PATH, &DeleteFileBody { public_id })
            .await?;
        if !ack.success {
            return Err(ApiError::Rejected(
                ack.message
                    .unwrap_or_else(|| "file could not be deleted".to_string()),
            ));
        }
        Ok(())
    }
}
