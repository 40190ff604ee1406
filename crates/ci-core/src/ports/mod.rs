//! Port interfaces for the application layer
//!
//! Ports define the contract between the wizard use cases and their
//! infrastructure: the REST backend, transient storage, the auth session and
//! the UI surface.

mod auth_session;
pub mod errors;
mod file_transfer;
mod intake_api;
mod notification;
mod snapshot_store;
mod wizard_event;

pub use auth_session::{AuthSessionPort, AuthUser};
pub use errors::ApiError;
pub use file_transfer::{FileTransferPort, UploadProgressFn, UploadReceipt};
pub use intake_api::{IntakeApiPort, RegistrationRequest};
pub use notification::{Notice, NoticeLevel, NotificationPort};
pub use snapshot_store::SnapshotStorePort;
pub use wizard_event::WizardEventPort;
