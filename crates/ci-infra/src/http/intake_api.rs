use async_trait::async_trait;
use ci_core::intake::{ConsultationRequest, SubmissionReceipt};
use ci_core::ports::{ApiError, IntakeApiPort, RegistrationRequest};
use tracing::{info, instrument};

use super::client::HttpIntakeClient;
use super::dto::{Ack, CheckEmailBody, CheckEmailResponse, CreateConsultationResponse, RegisterBody};

const CHECK_EMAIL_PATH: &str = "consultation/check-email";
const REGISTER_PATH: &str = "auth/register";
const CREATE_CONSULTATION_PATH: &str = "consultation/create-consultation";

#[async_trait]
impl IntakeApiPort for HttpIntakeClient {
    #[instrument(skip(self), err)]
    async fn check_email(&self, email: &str) -> Result<bool, ApiError> {
        let response: CheckEmailResponse = self
            .post_json(CHECK_EMAIL_PATH, &CheckEmailBody { email })
            .await?;
        Ok(response.exists)
    }

    #[instrument(skip_all, fields(email = %request.email), err)]
    async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError> {
        let body = RegisterBody {
            email: &request.email,
            name: &request.name,
            password: request.password.expose(),
        };
        let ack: Ack = self.post_json(REGISTER_PATH, &body).await?;
        if !ack.success {
            return Err(ApiError::Rejected(
                ack.message
                    .unwrap_or_else(|| "registration was not accepted".to_string()),
            ));
        }
        info!("registration accepted");
        Ok(())
    }

    #[instrument(skip_all, fields(attachments = request.attachments.len()), err)]
    async fn submit_consultation(
        &self,
        request: &ConsultationRequest,
    ) -> Result<SubmissionReceipt, ApiError> {
        let response: CreateConsultationResponse =
            self.post_json(CREATE_CONSULTATION_PATH, request).await?;
        if !response.success {
            return Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "consultation was not accepted".to_string()),
            ));
        }
        Ok(SubmissionReceipt {
            id: response.consultation_id.map(Into::into),
            message: response.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClientConfig;
    use ci_core::intake::IntakeDraft;
    use ci_core::security::SecretString;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &Server) -> HttpIntakeClient {
        HttpIntakeClient::new(HttpClientConfig {
            base_url: format!("{}/api/", server.url()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn check_email_posts_email_and_reads_exists() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/consultation/check-email")
            .match_body(Matcher::Json(json!({ "email": "client@shop.test" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"exists":true}"#)
            .create_async()
            .await;

        let exists = client(&server).check_email("client@shop.test").await.unwrap();

        assert!(exists);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn register_rejection_surfaces_server_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/register")
            .match_body(Matcher::PartialJson(json!({
                "email": "new@x.com",
                "name": "Ada",
                "password": "password123"
            })))
            .with_status(200)
            .with_body(r#"{"success":false,"message":"User already exists"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .register(&RegistrationRequest {
                email: "new@x.com".into(),
                name: "Ada".into(),
                password: SecretString::from("password123"),
            })
            .await;

        assert_eq!(
            result,
            Err(ApiError::Rejected("User already exists".into()))
        );
    }

    #[tokio::test]
    async fn server_errors_map_to_status_with_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/consultation/check-email")
            .with_status(503)
            .with_body(r#"{"message":"maintenance"}"#)
            .create_async()
            .await;

        let err = client(&server).check_email("a@b.co").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                code: 503,
                message: "maintenance".into()
            }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/consultation/check-email")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server).check_email("a@b.co").await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn submit_consultation_returns_receipt() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/consultation/create-consultation")
            .match_body(Matcher::PartialJson(json!({ "email": "owner@shop.test" })))
            .with_status(201)
            .with_body(r#"{"success":true,"consultationId":"cons-9","message":"Received"}"#)
            .create_async()
            .await;

        let request = ConsultationRequest::from_draft(
            &IntakeDraft::default(),
            Some("owner@shop.test".into()),
            &[],
        );
        let receipt = client(&server).submit_consultation(&request).await.unwrap();

        assert_eq!(receipt.id.unwrap().as_str(), "cons-9");
        assert_eq!(receipt.message.as_deref(), Some("Received"));
    }
}
