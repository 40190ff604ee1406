//! Infrastructure adapters for the intake ports: the REST backend, snapshot
//! storage, the auth session and notifications.

pub mod auth;
pub mod http;
pub mod notify;
pub mod session;

pub use auth::InMemoryAuthSession;
pub use http::{HttpClientConfig, HttpIntakeClient};
pub use notify::TracingNotifier;
pub use session::{FileSnapshotStore, InMemorySnapshotStore};
