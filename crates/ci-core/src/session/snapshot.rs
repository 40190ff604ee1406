use serde::{Deserialize, Serialize};

use crate::intake::{FeaturesData, ProjectData};

pub const SNAPSHOT_KEY_PREFIX: &str = "sessionData_";

/// In-progress wizard data parked while the user detours through login or
/// registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub project_data: ProjectData,
    pub features_data: FeaturesData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Read for compatibility with older entries, never written by us.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Storage key derived from an email: `sessionData_<email>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    pub fn for_email(email: &str) -> Self {
        Self(format!(
            "{SNAPSHOT_KEY_PREFIX}{}",
            normalize_email(email)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_prefix_and_normalized_email() {
        let key = SnapshotKey::for_email("  New@X.com ");
        assert_eq!(key.as_str(), "sessionData_new@x.com");
    }

    #[test]
    fn password_is_never_serialized() {
        let snapshot = SessionSnapshot {
            full_name: Some("Ada".into()),
            password: Some("secret-pass".into()),
            ..Default::default()
        };
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"fullName\":\"Ada\""));
        assert!(!json.contains("secret-pass"));
    }

    #[test]
    fn legacy_entry_with_password_still_parses() {
        let raw = r#"{
            "projectData": {"projectName":"Shop","projectType":"web-app","description":"d","timeline":"t","budget":"b"},
            "featuresData": {"features":["cart"],"priority":"high"},
            "password": "legacy"
        }"#;
        let snapshot = SessionSnapshot::from_json(raw).unwrap();
        assert_eq!(snapshot.project_data.project_name, "Shop");
        assert_eq!(snapshot.password.as_deref(), Some("legacy"));
        assert!(snapshot.features_data.integrations.is_empty());
    }
}
