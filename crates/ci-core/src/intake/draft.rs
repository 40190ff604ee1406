use serde::{Deserialize, Serialize};

use super::{ContactInfo, FeaturesData, PaymentData, ProjectData};

/// Everything the wizard has accumulated so far.
///
/// Uploaded files are tracked by the file stage, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeDraft {
    pub contact: ContactInfo,
    pub project: ProjectData,
    pub features: FeaturesData,
    pub payment: PaymentData,
}
