use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub name: Option<String>,
}

/// Who is signed in. The cookie itself belongs to the backend; this port only
/// answers the question and records sign-ins the wizard performs.
#[async_trait]
pub trait AuthSessionPort: Send + Sync {
    async fn current_user(&self) -> Option<AuthUser>;
    async fn sign_in(&self, user: AuthUser);
    async fn sign_out(&self);
}
