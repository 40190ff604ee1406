//! Wizard state machine.
//!
//! Pure transition function for the intake flow. Side effects are returned as
//! [`WizardAction`]s and executed by the orchestrator.

use crate::session::{normalize_email, SessionSnapshot};
use crate::validation::{self, Field, FieldError, FieldErrorKind};
use crate::wizard::{AuthGate, RegisterStage, WizardAction, WizardError, WizardEvent, WizardState, WizardStep};

pub struct WizardStateMachine;

impl WizardStateMachine {
    pub fn transition(mut state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        if state.completed {
            return (state, Vec::new());
        }
        if state.submitting {
            return Self::on_submission(state, event);
        }

        match event {
            WizardEvent::UpdateContact(contact) => {
                state.draft.contact = contact;
                state.field_errors.clear();
                (state, Vec::new())
            }
            WizardEvent::UpdateProject(project) => {
                state.draft.project = project;
                state.field_errors.clear();
                (state, Vec::new())
            }
            WizardEvent::UpdateFeatures(features) => {
                state.draft.features = features;
                state.field_errors.clear();
                (state, Vec::new())
            }
            WizardEvent::UpdatePayment(payment) => {
                state.draft.payment = payment;
                state.field_errors.clear();
                (state, Vec::new())
            }
            WizardEvent::Next {
                authenticated,
                uploads_pending,
            } => Self::next(state, authenticated, uploads_pending),
            WizardEvent::Back => Self::back(state),
            WizardEvent::RestoreSnapshot { email, snapshot } => {
                if state.gate.is_open() || state.step != WizardStep::FIRST {
                    return (state, Vec::new());
                }
                state.draft.project = snapshot.project_data;
                state.draft.features = snapshot.features_data;
                state.step = WizardStep::Files;
                state.field_errors.clear();
                state.error = None;
                (state, vec![WizardAction::DeleteSnapshot { email }])
            }
            WizardEvent::DismissGate => {
                state.gate = AuthGate::Closed;
                state.field_errors.clear();
                (state, Vec::new())
            }
            event => Self::on_gate(state, event),
        }
    }

    fn next(
        mut state: WizardState,
        authenticated: bool,
        uploads_pending: bool,
    ) -> (WizardState, Vec<WizardAction>) {
        if state.gate.is_open() {
            return (state, Vec::new());
        }

        // Files still uploading would be missing from the submission.
        if uploads_pending && state.step >= WizardStep::Files {
            state.field_errors = vec![FieldError::new(Field::Files, FieldErrorKind::UploadInProgress)];
            return (state, Vec::new());
        }

        let errors = validation::validate_step(state.step, &state.draft, authenticated);
        if !errors.is_empty() {
            state.field_errors = errors;
            return (state, Vec::new());
        }
        state.field_errors.clear();
        state.error = None;

        if state.step == WizardStep::FIRST && !authenticated {
            let email = normalize_email(&state.draft.contact.email);
            let snapshot = snapshot_of(&state, None);
            state.gate = AuthGate::CheckingEmail {
                email: email.clone(),
            };
            return (
                state,
                vec![
                    WizardAction::SaveSnapshot {
                        email: email.clone(),
                        snapshot,
                    },
                    WizardAction::CheckEmail { email },
                ],
            );
        }

        match state.step.next() {
            Some(step) => {
                state.step = step;
                (state, Vec::new())
            }
            None => {
                state.submitting = true;
                let draft = state.draft.clone();
                (state, vec![WizardAction::SubmitIntake { draft }])
            }
        }
    }

    fn back(mut state: WizardState) -> (WizardState, Vec<WizardAction>) {
        match &mut state.gate {
            AuthGate::Closed => {
                state.step = state.step.prev();
            }
            AuthGate::Register { stage, .. } => {
                *stage = match *stage {
                    RegisterStage::Name | RegisterStage::Password => RegisterStage::Name,
                    RegisterStage::Confirm => RegisterStage::Password,
                };
            }
            _ => return (state, Vec::new()),
        }
        state.field_errors.clear();
        state.error = None;
        (state, Vec::new())
    }

    fn on_gate(mut state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        let gate = std::mem::replace(&mut state.gate, AuthGate::Closed);
        match (gate, event) {
            (AuthGate::CheckingEmail { email }, WizardEvent::EmailChecked { exists }) => {
                state.gate = if exists {
                    AuthGate::LoginPrompt { email }
                } else {
                    AuthGate::Register {
                        email,
                        full_name: None,
                        stage: RegisterStage::Name,
                    }
                };
                (state, Vec::new())
            }
            (AuthGate::CheckingEmail { .. }, WizardEvent::EmailCheckFailed { message }) => {
                state.error = Some(WizardError::EmailCheckFailed {
                    message: message.clone(),
                });
                (state, vec![WizardAction::NotifyError { message }])
            }
            (
                AuthGate::Register {
                    email,
                    full_name,
                    stage: RegisterStage::Name,
                },
                WizardEvent::SubmitFullName { name },
            ) => {
                if let Some(error) = validation::validate_full_name(&name) {
                    state.gate = AuthGate::Register {
                        email,
                        full_name,
                        stage: RegisterStage::Name,
                    };
                    state.field_errors = vec![error];
                    return (state, Vec::new());
                }
                let name = name.trim().to_string();
                let snapshot = snapshot_of(&state, Some(name.clone()));
                state.field_errors.clear();
                state.gate = AuthGate::Register {
                    email: email.clone(),
                    full_name: Some(name),
                    stage: RegisterStage::Password,
                };
                (state, vec![WizardAction::SaveSnapshot { email, snapshot }])
            }
            (
                AuthGate::Register {
                    email,
                    full_name,
                    stage: RegisterStage::Password,
                },
                WizardEvent::SubmitPassword { password },
            ) => {
                let stage = match validation::validate_password(password.expose()) {
                    Some(error) => {
                        state.field_errors = vec![error];
                        RegisterStage::Password
                    }
                    None => {
                        state.field_errors.clear();
                        RegisterStage::Confirm
                    }
                };
                state.gate = AuthGate::Register {
                    email,
                    full_name,
                    stage,
                };
                (state, Vec::new())
            }
            (
                AuthGate::Register {
                    email,
                    full_name: Some(full_name),
                    stage: RegisterStage::Confirm,
                },
                WizardEvent::ConfirmPassword { password, confirm },
            ) => {
                if password != confirm {
                    state.gate = AuthGate::Register {
                        email,
                        full_name: Some(full_name),
                        stage: RegisterStage::Confirm,
                    };
                    state.field_errors = vec![FieldError::new(
                        Field::ConfirmPassword,
                        FieldErrorKind::Mismatch,
                    )];
                    return (state, Vec::new());
                }
                state.field_errors.clear();
                state.gate = AuthGate::Registering {
                    email: email.clone(),
                    full_name: full_name.clone(),
                };
                (
                    state,
                    vec![WizardAction::RegisterAccount {
                        email,
                        name: full_name,
                    }],
                )
            }
            (AuthGate::Registering { email, .. }, WizardEvent::RegistrationSucceeded) => {
                Self::resume_after_auth(state, email)
            }
            (AuthGate::Registering { email, full_name }, WizardEvent::RegistrationFailed { message }) => {
                state.gate = AuthGate::Register {
                    email,
                    full_name: Some(full_name),
                    stage: RegisterStage::Password,
                };
                state.error = Some(WizardError::RegistrationFailed {
                    message: message.clone(),
                });
                (state, vec![WizardAction::NotifyError { message }])
            }
            (gate, WizardEvent::LoginCompleted) => match gate.email() {
                Some(email) => {
                    let email = email.to_string();
                    Self::resume_after_auth(state, email)
                }
                None => (state, Vec::new()),
            },
            (gate, _event) => {
                state.gate = gate;
                (state, Vec::new())
            }
        }
    }

    /// Authentication finished: close the gate and complete the `next()` that
    /// opened it.
    fn resume_after_auth(mut state: WizardState, email: String) -> (WizardState, Vec<WizardAction>) {
        state.gate = AuthGate::Closed;
        state.field_errors.clear();
        state.error = None;
        if state.step == WizardStep::FIRST {
            state.step = WizardStep::Features;
        }
        (state, vec![WizardAction::DeleteSnapshot { email }])
    }

    fn on_submission(mut state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        match event {
            WizardEvent::SubmissionSucceeded { receipt } => {
                state.submitting = false;
                state.completed = true;
                (state, vec![WizardAction::CompleteIntake { receipt }])
            }
            WizardEvent::SubmissionFailed { message } => {
                state.submitting = false;
                state.error = Some(WizardError::SubmissionFailed {
                    message: message.clone(),
                });
                (state, vec![WizardAction::NotifyError { message }])
            }
            _ => (state, Vec::new()),
        }
    }
}

fn snapshot_of(state: &WizardState, full_name: Option<String>) -> SessionSnapshot {
    SessionSnapshot {
        project_data: state.draft.project.clone(),
        features_data: state.draft.features.clone(),
        full_name,
        password: None,
    }
}
