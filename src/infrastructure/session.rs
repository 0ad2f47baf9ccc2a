use crate::domain::ports::SessionProvider;
use crate::domain::types::Session;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local session source. The dashboard backend receives the
/// authenticated user out-of-band (deployment env / auth middleware), so the
/// provider just holds whatever it was handed.
pub struct StaticSessionProvider {
    session: RwLock<Option<Session>>,
}

impl StaticSessionProvider {
    pub fn with_user(user_id: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Some(Session {
                user_id: user_id.into(),
            })),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }

    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.session.read().await.clone())
    }
}
