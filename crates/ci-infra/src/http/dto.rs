//! Wire shapes of the REST backend.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct CheckEmailBody<'a> {
    pub email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckEmailResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
}

/// `{ success, message? }` acknowledgement used by several endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteFileBody<'a> {
    pub public_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateConsultationResponse {
    pub success: bool,
    #[serde(default, alias = "_id", alias = "id")]
    pub consultation_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
