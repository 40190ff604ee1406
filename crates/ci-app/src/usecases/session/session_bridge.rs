//! Session bridge.
//!
//! Parks in-progress wizard data under `sessionData_<email>` while the user
//! detours through login or registration, and hands it back exactly once.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ci_core::ports::SnapshotStorePort;
use ci_core::session::{RestoreEvent, RestorePhase, SessionSnapshot, SnapshotKey};

pub struct SessionBridge {
    store: Arc<dyn SnapshotStorePort>,
    phase: Mutex<RestorePhase>,
}

impl SessionBridge {
    pub fn new(store: Arc<dyn SnapshotStorePort>) -> Self {
        Self {
            store,
            phase: Mutex::new(RestorePhase::Pending),
        }
    }

    pub async fn phase(&self) -> RestorePhase {
        *self.phase.lock().await
    }

    pub async fn save(&self, email: &str, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        let key = SnapshotKey::for_email(email);
        let json = snapshot
            .to_json()
            .context("Failed to serialize session snapshot")?;
        self.store
            .save(&key, json)
            .await
            .with_context(|| format!("Failed to save session snapshot {key}"))?;
        debug!(%key, "session snapshot saved");
        Ok(())
    }

    pub async fn discard(&self, email: &str) -> anyhow::Result<()> {
        let key = SnapshotKey::for_email(email);
        self.store
            .remove(&key)
            .await
            .with_context(|| format!("Failed to remove session snapshot {key}"))?;
        self.advance(RestoreEvent::SnapshotDeleted).await;
        debug!(%key, "session snapshot removed");
        Ok(())
    }

    /// Read the snapshot for `email` if this wizard session has not tried yet.
    ///
    /// A corrupt entry is logged, removed and treated as absent.
    pub async fn take_for_restore(&self, email: &str) -> anyhow::Result<Option<SessionSnapshot>> {
        let mut phase = self.phase.lock().await;
        if !phase.can_attempt() {
            return Ok(None);
        }

        let key = SnapshotKey::for_email(email);
        let raw = self
            .store
            .load(&key)
            .await
            .with_context(|| format!("Failed to load session snapshot {key}"))?;

        let Some(raw) = raw else {
            *phase = phase.transition(RestoreEvent::SnapshotAbsent);
            return Ok(None);
        };

        match SessionSnapshot::from_json(&raw) {
            Ok(snapshot) => {
                *phase = phase.transition(RestoreEvent::SnapshotApplied);
                info!(%key, "session snapshot restored");
                Ok(Some(snapshot))
            }
            Err(err) => {
                warn!(%key, error = %err, "session snapshot is not valid JSON, ignoring it");
                if let Err(err) = self.store.remove(&key).await {
                    warn!(%key, error = %err, "failed to remove corrupt session snapshot");
                }
                *phase = phase.transition(RestoreEvent::SnapshotAbsent);
                Ok(None)
            }
        }
    }

    /// Re-arm the one-shot guard. Only closing the wizard does this.
    pub async fn reset(&self) {
        self.advance(RestoreEvent::WizardClosed).await;
    }

    async fn advance(&self, event: RestoreEvent) {
        let mut phase = self.phase.lock().await;
        *phase = phase.transition(event);
    }
}
