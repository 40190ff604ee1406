use crate::files::UploadedFile;
use crate::intake::SubmissionReceipt;
use crate::wizard::WizardState;

#[async_trait::async_trait]
pub trait WizardEventPort: Send + Sync {
    async fn emit_state_changed(&self, state: &WizardState);
    async fn emit_files_changed(&self, files: &[UploadedFile]);
    /// Completion callback of the terminal step.
    async fn emit_intake_completed(&self, receipt: &SubmissionReceipt);
}
