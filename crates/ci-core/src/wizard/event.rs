use crate::intake::{ContactInfo, FeaturesData, PaymentData, ProjectData, SubmissionReceipt};
use crate::security::SecretString;
use crate::session::SessionSnapshot;

/// Events that drive the wizard.
#[derive(Debug, PartialEq)]
pub enum WizardEvent {
    // Form stages
    UpdateContact(ContactInfo),
    UpdateProject(ProjectData),
    UpdateFeatures(FeaturesData),
    UpdatePayment(PaymentData),

    // Navigation
    Next {
        authenticated: bool,
        uploads_pending: bool,
    },
    Back,

    // Auth gate
    EmailChecked { exists: bool },
    EmailCheckFailed { message: String },
    SubmitFullName { name: String },
    SubmitPassword { password: SecretString },
    ConfirmPassword {
        password: SecretString,
        confirm: SecretString,
    },
    RegistrationSucceeded,
    RegistrationFailed { message: String },
    LoginCompleted,
    DismissGate,

    // Session bridge
    RestoreSnapshot {
        email: String,
        snapshot: SessionSnapshot,
    },

    // Submission results (from orchestrator)
    SubmissionSucceeded { receipt: SubmissionReceipt },
    SubmissionFailed { message: String },
}
