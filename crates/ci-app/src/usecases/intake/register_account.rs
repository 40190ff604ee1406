use std::sync::Arc;

use ci_core::ports::{ApiError, AuthSessionPort, AuthUser, IntakeApiPort, RegistrationRequest};
use ci_core::security::SecretString;
use ci_core::RetryPolicy;
use tracing::{info, info_span, Instrument};

use crate::retry::execute_with_retry;

/// Create an account and treat the new user as signed in.
///
/// The backend sets the session cookie on success; the auth port only
/// records who that cookie belongs to.
pub struct RegisterAccount {
    api: Arc<dyn IntakeApiPort>,
    auth: Arc<dyn AuthSessionPort>,
    retry: RetryPolicy,
}

impl RegisterAccount {
    pub fn new(api: Arc<dyn IntakeApiPort>, auth: Arc<dyn AuthSessionPort>, retry: RetryPolicy) -> Self {
        Self { api, auth, retry }
    }

    pub async fn execute(
        &self,
        email: String,
        name: String,
        password: SecretString,
    ) -> Result<AuthUser, ApiError> {
        let span = info_span!("usecase.register_account.execute", email = %email);
        async move {
            let request = RegistrationRequest {
                email,
                name,
                password,
            };
            let api = &self.api;
            let request_ref = &request;
            execute_with_retry(&self.retry, "register", move || async move {
                api.register(request_ref).await
            })
            .await?;

            let user = AuthUser {
                email: request.email.clone(),
                name: Some(request.name.clone()),
            };
            self.auth.sign_in(user.clone()).await;
            info!("account registered");
            Ok(user)
        }
        .instrument(span)
        .await
    }
}
