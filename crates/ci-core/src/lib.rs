//! # ci-core
//!
//! Core domain models and business logic for Consult Intake.
//!
//! This crate contains the intake wizard state machine and its records
//! without any infrastructure dependencies.

pub mod config;
pub mod files;
pub mod ids;
pub mod intake;
pub mod ports;
pub mod retry;
pub mod security;
pub mod session;
pub mod validation;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use files::{FileSizePolicy, SelectedFile, UploadStatus, UploadedFile};
pub use ids::{ConsultationId, FileId};
pub use intake::{ContactInfo, FeaturesData, IntakeDraft, PaymentData, ProjectData};
pub use retry::RetryPolicy;
pub use session::{RestorePhase, SessionSnapshot, SnapshotKey};
pub use wizard::{AuthGate, WizardAction, WizardEvent, WizardState, WizardStateMachine, WizardStep};
