//! Dependency grouping for wizard construction.
//!
//! Just parameter grouping: every port is required and nothing is defaulted.

use std::sync::Arc;

use ci_core::ports::{
    AuthSessionPort, FileTransferPort, IntakeApiPort, NotificationPort, SnapshotStorePort,
    WizardEventPort,
};

pub struct IntakeDeps {
    pub auth: Arc<dyn AuthSessionPort>,
    pub api: Arc<dyn IntakeApiPort>,
    pub file_transfer: Arc<dyn FileTransferPort>,
    pub snapshot_store: Arc<dyn SnapshotStorePort>,
    pub notifier: Arc<dyn NotificationPort>,
    pub events: Arc<dyn WizardEventPort>,
}
