use std::sync::Arc;

use ci_core::ports::{ApiError, IntakeApiPort};
use ci_core::RetryPolicy;
use tracing::{info_span, Instrument};

use crate::retry::execute_with_retry;

/// Ask the backend whether an email already belongs to an account.
pub struct CheckEmailExists {
    api: Arc<dyn IntakeApiPort>,
    retry: RetryPolicy,
}

impl CheckEmailExists {
    pub fn new(api: Arc<dyn IntakeApiPort>, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    pub async fn execute(&self, email: &str) -> Result<bool, ApiError> {
        let api = &self.api;
        execute_with_retry(&self.retry, "check_email", move || async move {
            api.check_email(email).await
        })
        .instrument(info_span!("usecase.check_email.execute"))
        .await
    }
}
