use crate::{
    application::services::{SessionContext, UserService},
    domain::entities::UserProfile,
    presentation::dto::{
        ApiResponse, Validate,
        user_dto::{IdentityDto, SaveProfileRequest},
    },
    shared::AppConfig,
};
use std::sync::Arc;

pub struct UserHandler {
    user_service: Arc<UserService>,
    session: Arc<SessionContext>,
    config: AppConfig,
}

impl UserHandler {
    pub fn new(
        user_service: Arc<UserService>,
        session: Arc<SessionContext>,
        config: AppConfig,
    ) -> Self {
        Self {
            user_service,
            session,
            config,
        }
    }

    /// サインインしていなければ `None`。名前が未設定なら短縮した principal を表示名にする。
    pub async fn identity(&self) -> Option<IdentityDto> {
        let principal = self.session.principal()?;
        let profile = self.user_service.caller_profile().await.ok().flatten();
        let display_name = profile
            .as_ref()
            .and_then(UserProfile::display_name)
            .map(str::to_string)
            .unwrap_or_else(|| principal.truncated(self.config.display.principal_prefix));
        let role = self
            .user_service
            .caller_role()
            .await
            .map(|role| role.to_string());

        Some(IdentityDto {
            principal: principal.to_string(),
            display_name,
            role,
        })
    }

    pub async fn save_profile(&self, request: SaveProfileRequest) -> ApiResponse<()> {
        if let Err(e) = request.validate() {
            return ApiResponse::from_app_error(e);
        }
        ApiResponse::from_result(
            self.user_service
                .save_caller_profile(UserProfile::new(request.name.trim()))
                .await,
        )
    }
}
