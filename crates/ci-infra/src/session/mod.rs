//! Snapshot stores.
//!
//! The in-memory store matches the transient, per-tab storage the wizard
//! expects. The file store keeps entries across process restarts, which the
//! command-line driver needs between a registration run and a resume run.

mod file_store;
mod memory_store;

pub use file_store::{default_snapshot_dir, FileSnapshotStore};
pub use memory_store::InMemorySnapshotStore;
