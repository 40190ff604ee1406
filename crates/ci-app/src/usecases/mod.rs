//! Intake use cases
//!
//! The wizard orchestrator owns the flow; the session bridge and the file
//! stage are collaborators it drives, and the intake use cases are the
//! capabilities its actions call into.

pub mod files;
pub mod intake;
pub mod session;
pub mod wizard;

pub use files::FileStage;
pub use intake::{CheckEmailExists, RegisterAccount, SubmitIntake};
pub use session::SessionBridge;
pub use wizard::{WizardOrchestrator, WizardOrchestratorError};
