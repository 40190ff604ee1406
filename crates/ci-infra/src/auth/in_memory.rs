use async_trait::async_trait;
use ci_core::ports::{AuthSessionPort, AuthUser};
use tokio::sync::RwLock;
use tracing::info;

/// Process-local record of the signed-in user.
///
/// The backend's session cookie lives in the HTTP client's cookie store;
/// this adapter only remembers whose it is.
#[derive(Default)]
pub struct InMemoryAuthSession {
    user: RwLock<Option<AuthUser>>,
}

impl InMemoryAuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }
}

#[async_trait]
impl AuthSessionPort for InMemoryAuthSession {
    async fn current_user(&self) -> Option<AuthUser> {
        self.user.read().await.clone()
    }

    async fn sign_in(&self, user: AuthUser) {
        info!(email = %user.email, "signed in");
        *self.user.write().await = Some(user);
    }

    async fn sign_out(&self) {
        if let Some(user) = self.user.write().await.take() {
            info!(email = %user.email, "signed out");
        }
    }
}
