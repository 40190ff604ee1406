//! Startup: configuration, tracing and wiring.

pub mod config;
pub mod events;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_config};
pub use events::JsonLinesEventPort;
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{wire_dependencies, IntakeRuntime};
