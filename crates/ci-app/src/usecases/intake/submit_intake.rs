use std::sync::Arc;

use ci_core::files::UploadedFile;
use ci_core::intake::{ConsultationRequest, IntakeDraft, SubmissionReceipt};
use ci_core::ports::{ApiError, IntakeApiPort};
use ci_core::RetryPolicy;
use tracing::{info, info_span, Instrument};

use crate::retry::execute_with_retry;

/// Send the finished intake to the backend.
pub struct SubmitIntake {
    api: Arc<dyn IntakeApiPort>,
    retry: RetryPolicy,
}

impl SubmitIntake {
    pub fn new(api: Arc<dyn IntakeApiPort>, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    pub async fn execute(
        &self,
        draft: &IntakeDraft,
        email: Option<String>,
        files: &[UploadedFile],
    ) -> Result<SubmissionReceipt, ApiError> {
        let request = ConsultationRequest::from_draft(draft, email, files);
        let span = info_span!(
            "usecase.submit_intake.execute",
            attachments = request.attachments.len()
        );
        let api = &self.api;
        let request = &request;
        let receipt = execute_with_retry(&self.retry, "create_consultation", move || async move {
            api.submit_consultation(request).await
        })
        .instrument(span)
        .await?;

        info!(id = ?receipt.id, "consultation created");
        Ok(receipt)
    }
}
