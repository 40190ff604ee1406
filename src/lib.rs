//! Consult Intake
//!
//! Bootstrap and command-line driver for the consultation intake wizard.
//! The wizard itself lives in `ci-core` (rules) and `ci-app` (use cases);
//! `ci-infra` talks to the REST backend.

pub mod bootstrap;
pub mod script;

pub use bootstrap::{init_tracing_subscriber, resolve_config, wire_dependencies, IntakeRuntime};
