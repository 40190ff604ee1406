use std::sync::Arc;

use tokio::sync::Mutex;

use ci_core::wizard::WizardState;

struct Slot {
    state: WizardState,
    /// Bumped on every close; results computed for an older generation are dropped.
    generation: u64,
}

/// Shared wizard context containing state and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `slot`.
/// `close` only takes `slot`, so it never waits behind an in-flight request.
#[derive(Clone)]
pub struct WizardContext {
    slot: Arc<Mutex<Slot>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl WizardContext {
    pub fn new(initial_state: WizardState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: initial_state,
                generation: 0,
            })),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn get_state(&self) -> WizardState {
        self.slot.lock().await.state.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.slot.lock().await.generation
    }

    /// Read state and generation together, for the start of a dispatch.
    pub async fn snapshot(&self) -> (WizardState, u64) {
        let slot = self.slot.lock().await;
        (slot.state.clone(), slot.generation)
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Store `state` unless the wizard was closed since `generation` was read.
    pub async fn commit(&self, generation: u64, state: WizardState) -> bool {
        let mut slot = self.slot.lock().await;
        if slot.generation != generation {
            return false;
        }
        slot.state = state;
        true
    }

    /// Start a new wizard session with `state`, invalidating in-flight work.
    pub async fn reset(&self, state: WizardState) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.state = state;
    }
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::new(WizardState::initial())
    }
}
