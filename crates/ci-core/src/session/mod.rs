//! Session bridge domain: snapshots and the one-shot restore guard.

pub mod restore;
mod snapshot;

pub use restore::{RestoreEvent, RestorePhase};
pub use snapshot::{normalize_email, SessionSnapshot, SnapshotKey, SNAPSHOT_KEY_PREFIX};
