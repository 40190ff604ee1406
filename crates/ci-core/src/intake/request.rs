//! Final submission body and the backend's answer.

use serde::{Deserialize, Serialize};

use super::{FeaturesData, IntakeDraft, PaymentData, ProjectData};
use crate::files::UploadedFile;
use crate::ids::ConsultationId;

/// Reference to an uploaded attachment as the backend knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub name: String,
    pub size: u64,
    pub url: String,
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    /// Present only when the submitter is known by email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub project: ProjectData,
    #[serde(flatten)]
    pub features: FeaturesData,
    pub payment: PaymentData,
    pub attachments: Vec<AttachmentRef>,
}

impl ConsultationRequest {
    /// Build the request from the draft and the files that finished uploading.
    ///
    /// Entries without a url (pending, failed, oversized) are skipped.
    pub fn from_draft(draft: &IntakeDraft, email: Option<String>, files: &[UploadedFile]) -> Self {
        let attachments = files
            .iter()
            .filter_map(|file| {
                file.url.as_ref().map(|url| AttachmentRef {
                    name: file.name.clone(),
                    size: file.size,
                    url: url.clone(),
                    public_id: file.public_id.clone(),
                })
            })
            .collect();

        Self {
            email,
            project: draft.project.clone(),
            features: draft.features.clone(),
            payment: draft.payment.clone(),
            attachments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: Option<ConsultationId>,
    pub message: Option<String>,
}
