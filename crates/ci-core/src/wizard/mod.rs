//! Intake wizard domain.
//!
//! Steps, the orthogonal auth gate and the pure transition function.

mod action;
mod error;
mod event;
mod state;
pub mod state_machine;

pub use action::WizardAction;
pub use error::WizardError;
pub use event::WizardEvent;
pub use state::{AuthGate, RegisterStage, WizardState, WizardStep};
pub use state_machine::WizardStateMachine;
