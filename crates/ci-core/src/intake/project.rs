use serde::{Deserialize, Serialize};

/// Step 1: what the client wants built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub project_name: String,
    pub project_type: String,
    pub description: String,
    pub timeline: String,
    pub budget: String,
}

/// Contact details collected alongside step 1 when nobody is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
}
