use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Step 2: requested features, in the order the client listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesData {
    pub features: Vec<String>,
    pub priority: String,
    #[serde(default)]
    pub integrations: BTreeSet<String>,
}
