use super::{AuthError, AuthProvider, User};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Signs in as the user from the local configuration.
pub struct LocalAuth {
    configured: Option<User>,
    current: RwLock<Option<User>>,
}

impl LocalAuth {
    pub fn new(configured: Option<User>) -> Self {
        Self {
            configured,
            current: RwLock::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    async fn sign_in(&self) -> Result<User, AuthError> {
        let user = self
            .configured
            .clone()
            .ok_or_else(|| AuthError::new("auth/no-user-configured", "no local user configured"))?;
        info!(uid = %user.uid, "signed in");
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(user) = self.current.write().await.take() {
            debug!(uid = %user.uid, "signed out");
        }
        Ok(())
    }
}
