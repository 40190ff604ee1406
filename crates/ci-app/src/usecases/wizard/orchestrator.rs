//! Wizard orchestrator.
//!
//! This module coordinates the wizard state machine and its side effects:
//! the auth gate requests, the session bridge and the final submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use ci_core::intake::{ContactInfo, FeaturesData, PaymentData, ProjectData};
use ci_core::ports::{AuthSessionPort, Notice, NotificationPort, WizardEventPort};
use ci_core::security::SecretString;
use ci_core::session::RestorePhase;
use ci_core::wizard::{WizardAction, WizardEvent, WizardState, WizardStateMachine, WizardStep};
use ci_core::{AppConfig, RetryPolicy};

use crate::deps::IntakeDeps;
use crate::usecases::files::FileStage;
use crate::usecases::intake::{CheckEmailExists, RegisterAccount, SubmitIntake};
use crate::usecases::session::SessionBridge;
use crate::usecases::wizard::context::WizardContext;

/// Infrastructure failures of the orchestrator. User-facing problems are
/// reported on the wizard state and as notifications instead.
#[derive(Debug, thiserror::Error)]
pub enum WizardOrchestratorError {
    #[error("session snapshot store failed: {0}")]
    SnapshotStore(#[source] anyhow::Error),
}

/// Orchestrator that drives wizard state and side effects.
pub struct WizardOrchestrator {
    context: Arc<WizardContext>,
    opened: AtomicBool,
    /// Password typed in the registration sub-flow, held until it is sent.
    password: Mutex<Option<SecretString>>,

    // Capability use cases
    check_email: CheckEmailExists,
    register_account: RegisterAccount,
    submit_intake: SubmitIntake,

    session_bridge: SessionBridge,
    file_stage: Arc<FileStage>,
    auth: Arc<dyn AuthSessionPort>,
    notifier: Arc<dyn NotificationPort>,
    events: Arc<dyn WizardEventPort>,
}

impl WizardOrchestrator {
    pub fn new(deps: IntakeDeps, config: &AppConfig) -> Self {
        Self::with_policies(deps, config.retry_policy(), config.file_size_policy())
    }

    pub fn with_policies(
        deps: IntakeDeps,
        retry: RetryPolicy,
        file_size: ci_core::FileSizePolicy,
    ) -> Self {
        let IntakeDeps {
            auth,
            api,
            file_transfer,
            snapshot_store,
            notifier,
            events,
        } = deps;

        Self {
            context: WizardContext::default().arc(),
            opened: AtomicBool::new(false),
            password: Mutex::new(None),
            check_email: CheckEmailExists::new(api.clone(), retry),
            register_account: RegisterAccount::new(api.clone(), auth.clone(), retry),
            submit_intake: SubmitIntake::new(api, retry),
            session_bridge: SessionBridge::new(snapshot_store),
            file_stage: Arc::new(FileStage::new(
                file_size,
                file_transfer,
                notifier.clone(),
                events.clone(),
            )),
            auth,
            notifier,
            events,
        }
    }

    pub fn file_stage(&self) -> Arc<FileStage> {
        Arc::clone(&self.file_stage)
    }

    pub async fn get_state(&self) -> WizardState {
        self.context.get_state().await
    }

    pub async fn restore_phase(&self) -> RestorePhase {
        self.session_bridge.phase().await
    }

    /// Open the wizard at step 1, restoring a parked snapshot for a signed-in user.
    pub async fn open(&self) -> Result<WizardState, WizardOrchestratorError> {
        self.reset().await;
        self.opened.store(true, Ordering::SeqCst);
        info!("wizard opened");
        self.restore_if_pending().await
    }

    /// Close the wizard. Everything is reset and late responses are dropped.
    pub async fn close(&self) {
        self.opened.store(false, Ordering::SeqCst);
        self.reset().await;
        info!("wizard closed");
    }

    /// The auth session changed outside the wizard (e.g. a login completed).
    ///
    /// Ignored while the wizard is closed; `open` picks the change up.
    pub async fn on_auth_changed(&self) -> Result<WizardState, WizardOrchestratorError> {
        let state = self.context.get_state().await;
        if !self.opened.load(Ordering::SeqCst) {
            return Ok(state);
        }
        if state.gate.is_open() {
            if self.auth.current_user().await.is_some() {
                return Ok(self.dispatch(WizardEvent::LoginCompleted).await);
            }
            return Ok(state);
        }
        self.restore_if_pending().await
    }

    pub async fn update_contact(&self, contact: ContactInfo) -> WizardState {
        self.dispatch(WizardEvent::UpdateContact(contact)).await
    }

    pub async fn update_project(&self, project: ProjectData) -> WizardState {
        self.dispatch(WizardEvent::UpdateProject(project)).await
    }

    pub async fn update_features(&self, features: FeaturesData) -> WizardState {
        self.dispatch(WizardEvent::UpdateFeatures(features)).await
    }

    pub async fn update_payment(&self, payment: PaymentData) -> WizardState {
        self.dispatch(WizardEvent::UpdatePayment(payment)).await
    }

    pub async fn next(&self) -> WizardState {
        let authenticated = self.auth.current_user().await.is_some();
        let uploads_pending = self.file_stage.has_pending_uploads();
        self.dispatch(WizardEvent::Next {
            authenticated,
            uploads_pending,
        })
        .await
    }

    pub async fn back(&self) -> WizardState {
        self.dispatch(WizardEvent::Back).await
    }

    pub async fn submit_full_name(&self, name: String) -> WizardState {
        self.dispatch(WizardEvent::SubmitFullName { name }).await
    }

    pub async fn submit_password(&self, password: String) -> WizardState {
        let event = WizardEvent::SubmitPassword {
            password: SecretString::new(password.clone()),
        };
        *self.password.lock().await = Some(SecretString::new(password));
        self.dispatch(event).await
    }

    pub async fn confirm_password(&self, confirm: String) -> WizardState {
        let password = self
            .password
            .lock()
            .await
            .as_ref()
            .map(|password| SecretString::new(password.expose().to_string()))
            .unwrap_or_else(|| SecretString::new(String::new()));
        let event = WizardEvent::ConfirmPassword {
            password,
            confirm: SecretString::new(confirm),
        };
        self.dispatch(event).await
    }

    pub async fn dismiss_gate(&self) -> WizardState {
        self.dispatch(WizardEvent::DismissGate).await
    }

    async fn reset(&self) {
        self.context.reset(WizardState::initial()).await;
        self.session_bridge.reset().await;
        self.file_stage.clear().await;
        self.password.lock().await.take();
        self.events
            .emit_state_changed(&self.context.get_state().await)
            .await;
    }

    async fn restore_if_pending(&self) -> Result<WizardState, WizardOrchestratorError> {
        // Held across the check so the restore event cannot be ignored after
        // the snapshot was taken.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let state = self.context.get_state().await;
        if state.step != WizardStep::FIRST || state.gate.is_open() {
            return Ok(state);
        }
        let Some(user) = self.auth.current_user().await else {
            return Ok(state);
        };

        let snapshot = self
            .session_bridge
            .take_for_restore(&user.email)
            .await
            .map_err(WizardOrchestratorError::SnapshotStore)?;

        match snapshot {
            Some(snapshot) => Ok(self
                .dispatch_locked(WizardEvent::RestoreSnapshot {
                    email: user.email,
                    snapshot,
                })
                .await),
            None => Ok(state),
        }
    }

    async fn dispatch(&self, event: WizardEvent) -> WizardState {
        // Acquire dispatch lock to serialize concurrent dispatch calls.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.dispatch_locked(event).await
    }

    /// Caller must hold the dispatch lock.
    async fn dispatch_locked(&self, event: WizardEvent) -> WizardState {
        let span = info_span!("usecase.wizard_orchestrator.dispatch", event = ?event);
        async {
            let (mut current, generation) = self.context.snapshot().await;
            let mut pending_events = vec![event];

            while let Some(event) = pending_events.pop() {
                let from = (current.step, current.gate.clone());
                let event_name = format!("{:?}", event);
                let (next, actions) = WizardStateMachine::transition(current, event);
                info!(
                    from = ?from,
                    to = ?(next.step, &next.gate),
                    event = %event_name,
                    "wizard state transition"
                );

                // Publish before running actions so in-flight states are observable.
                if !self.context.commit(generation, next.clone()).await {
                    debug!("wizard closed during dispatch, dropping result");
                    return self.context.get_state().await;
                }
                self.events.emit_state_changed(&next).await;

                let follow_up_events = self.execute_actions(actions).await;
                if self.context.generation().await != generation {
                    debug!("wizard closed during side effects, dropping follow-ups");
                    return self.context.get_state().await;
                }

                current = next;
                pending_events.extend(follow_up_events);
            }

            current
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(&self, actions: Vec<WizardAction>) -> Vec<WizardEvent> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "wizard executing action");
            match action {
                WizardAction::CheckEmail { email } => {
                    let event = match self.check_email.execute(&email).await {
                        Ok(exists) => WizardEvent::EmailChecked { exists },
                        Err(err) => {
                            warn!(error = %err, "email check failed");
                            WizardEvent::EmailCheckFailed {
                                message: format!("Could not verify your email: {err}"),
                            }
                        }
                    };
                    follow_up_events.push(event);
                }
                WizardAction::SaveSnapshot { email, snapshot } => {
                    if let Err(err) = self.session_bridge.save(&email, &snapshot).await {
                        warn!(error = %err, "failed to park session snapshot");
                    }
                }
                WizardAction::DeleteSnapshot { email } => {
                    if let Err(err) = self.session_bridge.discard(&email).await {
                        warn!(error = %err, "failed to delete session snapshot");
                    }
                }
                WizardAction::RegisterAccount { email, name } => {
                    follow_up_events.push(self.register(email, name).await);
                }
                WizardAction::SubmitIntake { draft } => {
                    let email = match self.auth.current_user().await {
                        Some(user) => Some(user.email),
                        None => Some(draft.contact.email.trim().to_string())
                            .filter(|email| !email.is_empty()),
                    };
                    let files = self.file_stage.uploaded_files();
                    let event = match self.submit_intake.execute(&draft, email, &files).await {
                        Ok(receipt) => WizardEvent::SubmissionSucceeded { receipt },
                        Err(err) => {
                            warn!(error = %err, "consultation submission failed");
                            WizardEvent::SubmissionFailed {
                                message: format!("Failed to submit your request: {err}"),
                            }
                        }
                    };
                    follow_up_events.push(event);
                }
                WizardAction::NotifyError { message } => {
                    self.notifier.notify(Notice::error(message)).await;
                }
                WizardAction::CompleteIntake { receipt } => {
                    let message = receipt
                        .message
                        .clone()
                        .unwrap_or_else(|| "Your consultation request was submitted".to_string());
                    self.notifier.notify(Notice::success(message)).await;
                    self.events.emit_intake_completed(&receipt).await;
                }
            }
        }
        follow_up_events
    }

    async fn register(&self, email: String, name: String) -> WizardEvent {
        let Some(password) = self.password.lock().await.take() else {
            warn!("registration requested without a captured password");
            return WizardEvent::RegistrationFailed {
                message: "Please enter your password again".to_string(),
            };
        };

        match self.register_account.execute(email, name, password).await {
            Ok(_) => {
                self.notifier
                    .notify(Notice::success("Account created successfully"))
                    .await;
                WizardEvent::RegistrationSucceeded
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                WizardEvent::RegistrationFailed {
                    message: format!("Registration failed: {err}"),
                }
            }
        }
    }
}
