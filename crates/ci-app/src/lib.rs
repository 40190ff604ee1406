//! Consult Intake application layer
//!
//! This crate contains the wizard use cases and their orchestration. It only
//! talks to the outside world through the ports declared in `ci-core`.

pub mod deps;
pub mod retry;
pub mod usecases;

pub use deps::IntakeDeps;
pub use usecases::{FileStage, SessionBridge, WizardOrchestrator, WizardOrchestratorError};
