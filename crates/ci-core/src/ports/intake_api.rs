use async_trait::async_trait;

use crate::intake::{ConsultationRequest, SubmissionReceipt};
use crate::ports::errors::ApiError;
use crate::security::SecretString;

#[derive(Debug)]
pub struct RegistrationRequest {
    pub email: String,
    pub name: String,
    pub password: SecretString,
}

/// Backend calls made by the wizard.
#[async_trait]
pub trait IntakeApiPort: Send + Sync {
    /// `true` when the email already belongs to an account.
    async fn check_email(&self, email: &str) -> Result<bool, ApiError>;

    async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError>;

    async fn submit_consultation(
        &self,
        request: &ConsultationRequest,
    ) -> Result<SubmissionReceipt, ApiError>;
}
