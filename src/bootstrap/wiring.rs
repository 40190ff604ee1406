//! Dependency wiring: adapters in, orchestrator out.

use std::sync::Arc;

use ci_app::{IntakeDeps, WizardOrchestrator};
use ci_core::config::AppConfig;
use ci_core::ports::{AuthSessionPort, SnapshotStorePort, WizardEventPort};
use ci_infra::{
    FileSnapshotStore, HttpClientConfig, HttpIntakeClient, InMemoryAuthSession,
    InMemorySnapshotStore, TracingNotifier,
};
use tracing::info;

/// Everything a driver needs after startup.
pub struct IntakeRuntime {
    pub orchestrator: WizardOrchestrator,
    pub auth: Arc<InMemoryAuthSession>,
    pub client: Arc<HttpIntakeClient>,
}

pub fn build_snapshot_store(config: &AppConfig) -> Arc<dyn SnapshotStorePort> {
    match &config.storage.snapshot_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "session snapshots on disk");
            Arc::new(FileSnapshotStore::new(dir.clone()))
        }
        None => Arc::new(InMemorySnapshotStore::new()),
    }
}

pub fn wire_dependencies(
    config: &AppConfig,
    events: Arc<dyn WizardEventPort>,
) -> anyhow::Result<IntakeRuntime> {
    let client = Arc::new(HttpIntakeClient::new(HttpClientConfig::from_app_config(config))?);
    let auth = Arc::new(InMemoryAuthSession::new());

    let deps = IntakeDeps {
        auth: auth.clone() as Arc<dyn AuthSessionPort>,
        api: client.clone(),
        file_transfer: client.clone(),
        snapshot_store: build_snapshot_store(config),
        notifier: Arc::new(TracingNotifier),
        events,
    };
    info!(base_url = %client.base_url(), "intake wired");

    Ok(IntakeRuntime {
        orchestrator: WizardOrchestrator::new(deps, config),
        auth,
        client,
    })
}
