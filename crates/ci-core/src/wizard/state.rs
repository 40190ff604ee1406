use serde::{Deserialize, Serialize};

use crate::intake::IntakeDraft;
use crate::validation::FieldError;
use crate::wizard::WizardError;

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Description,
    Features,
    Files,
    Review,
    Payment,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Description;
    pub const LAST: WizardStep = WizardStep::Payment;

    /// 1-based position shown to the user.
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Description => 1,
            WizardStep::Features => 2,
            WizardStep::Files => 3,
            WizardStep::Review => 4,
            WizardStep::Payment => 5,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(WizardStep::Description),
            2 => Some(WizardStep::Features),
            3 => Some(WizardStep::Files),
            4 => Some(WizardStep::Review),
            5 => Some(WizardStep::Payment),
            _ => None,
        }
    }

    /// Following step; the last step has none.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Previous step, floored at the first one.
    pub fn prev(self) -> Self {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(Self::FIRST)
    }
}

/// Registration sub-steps inside the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStage {
    Name,
    Password,
    Confirm,
}

/// Orthogonal auth gate, only ever opened when leaving step 1 unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum AuthGate {
    Closed,
    /// Email existence check in flight; continue is disabled.
    CheckingEmail { email: String },
    /// Email belongs to an account: ask the user to log in to continue.
    LoginPrompt { email: String },
    /// Inline registration.
    Register {
        email: String,
        full_name: Option<String>,
        stage: RegisterStage,
    },
    /// Registration request in flight.
    Registering { email: String, full_name: String },
}

impl AuthGate {
    pub fn is_open(&self) -> bool {
        !matches!(self, AuthGate::Closed)
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            AuthGate::Closed => None,
            AuthGate::CheckingEmail { email }
            | AuthGate::LoginPrompt { email }
            | AuthGate::Register { email, .. }
            | AuthGate::Registering { email, .. } => Some(email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub step: WizardStep,
    pub gate: AuthGate,
    pub draft: IntakeDraft,
    /// Inline errors for the current step or registration sub-step.
    pub field_errors: Vec<FieldError>,
    pub error: Option<WizardError>,
    /// Final submission in flight.
    pub submitting: bool,
    pub completed: bool,
}

impl WizardState {
    pub fn initial() -> Self {
        Self {
            step: WizardStep::FIRST,
            gate: AuthGate::Closed,
            draft: IntakeDraft::default(),
            field_errors: Vec::new(),
            error: None,
            submitting: false,
            completed: false,
        }
    }

    /// Whether the continue affordance is enabled.
    pub fn can_continue(&self) -> bool {
        !self.gate.is_open() && !self.submitting && !self.completed
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::initial()
    }
}
