use super::session_service::{SessionClient, SessionContext};
use crate::application::ports::cache::{PostCache, QueryKey};
use crate::domain::entities::{UserProfile, UserRole};
use crate::domain::value_objects::Principal;
use crate::shared::error::AppError;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{info, warn};

/// 呼び出し元のプロフィールとロール
#[derive(Clone)]
pub struct UserService {
    session: Arc<SessionContext>,
    cache: Arc<dyn PostCache>,
}

impl UserService {
    pub fn new(session: Arc<SessionContext>, cache: Arc<dyn PostCache>) -> Self {
        Self { session, cache }
    }

    async fn require_client(&self) -> Result<SessionClient, AppError> {
        let snapshot = self.session.current();
        self.cache.bind_session(snapshot.generation).await?;
        snapshot.state.client().cloned().ok_or(AppError::NoSession)
    }

    pub async fn caller_profile(&self) -> Result<Option<UserProfile>, AppError> {
        let client = self.require_client().await?;
        let backend = Arc::clone(&client.backend);
        let load = async move { backend.get_caller_user_profile().await }.boxed();
        self.cache.caller_profile(load).await
    }

    pub async fn save_caller_profile(&self, profile: UserProfile) -> Result<(), AppError> {
        let client = self.require_client().await?;
        client.backend.save_caller_user_profile(profile).await?;
        self.cache.invalidate(&QueryKey::CallerProfile).await;
        info!(principal = %client.principal, "caller profile saved");
        Ok(())
    }

    pub async fn user_profile(&self, user: &Principal) -> Result<Option<UserProfile>, AppError> {
        let client = self.require_client().await?;
        client.backend.get_user_profile(user).await
    }

    /// サインインしていなければ `None`
    pub async fn caller_role(&self) -> Option<UserRole> {
        let client = self.require_client().await.ok()?;
        match client.backend.get_caller_user_role().await {
            Ok(role) => Some(role),
            Err(e) => {
                warn!(error = %e, "failed to load caller role");
                None
            }
        }
    }

    pub async fn is_caller_admin(&self) -> bool {
        let Ok(client) = self.require_client().await else {
            return false;
        };
        client.backend.is_caller_admin().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to check admin status");
            false
        })
    }

    pub async fn assign_role(&self, user: &Principal, role: UserRole) -> Result<(), AppError> {
        let client = self.require_client().await?;
        client.backend.assign_caller_user_role(user, role).await?;
        info!(user = %user, role = %role, "role assigned");
        Ok(())
    }
}
