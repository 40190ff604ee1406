//! One-shot snapshot restoration as an explicit state machine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePhase {
    /// Wizard opened, no restore attempted yet.
    Pending,
    /// A snapshot was applied; deleting it is the remaining step.
    Restored,
    /// Nothing left to do until the wizard is closed.
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreEvent {
    SnapshotApplied,
    SnapshotAbsent,
    SnapshotDeleted,
    WizardClosed,
}

impl RestorePhase {
    pub fn can_attempt(self) -> bool {
        matches!(self, RestorePhase::Pending)
    }

    pub fn transition(self, event: RestoreEvent) -> RestorePhase {
        match (self, event) {
            (_, RestoreEvent::WizardClosed) => RestorePhase::Pending,
            (RestorePhase::Pending, RestoreEvent::SnapshotApplied) => RestorePhase::Restored,
            (RestorePhase::Pending, RestoreEvent::SnapshotAbsent) => RestorePhase::Consumed,
            (RestorePhase::Restored, RestoreEvent::SnapshotDeleted) => RestorePhase::Consumed,
            (phase, _) => phase,
        }
    }
}

impl Default for RestorePhase {
    fn default() -> Self {
        RestorePhase::Pending
    }
}
