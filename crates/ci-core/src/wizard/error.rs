/// User-facing wizard errors, shown next to the transient notification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardError {
    EmailCheckFailed { message: String },
    RegistrationFailed { message: String },
    SubmissionFailed { message: String },
}
