use crate::intake::{IntakeDraft, SubmissionReceipt};
use crate::session::SessionSnapshot;

/// Side-effects requested by a wizard transition.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    /// Ask the backend whether the email belongs to an account.
    CheckEmail { email: String },
    /// Persist in-progress data before the auth detour.
    SaveSnapshot {
        email: String,
        snapshot: SessionSnapshot,
    },
    DeleteSnapshot { email: String },
    /// Register with the password captured by the orchestrator.
    RegisterAccount { email: String, name: String },
    SubmitIntake { draft: IntakeDraft },
    NotifyError { message: String },
    /// Fire the completion callback.
    CompleteIntake { receipt: SubmissionReceipt },
}
