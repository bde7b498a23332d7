use crate::application::ports::cache::PostCache;
use crate::application::services::{PostService, SessionContext, UserService};
use crate::infrastructure::cache::PostCacheService;
use crate::presentation::handlers::{PostHandler, UserHandler};
use crate::shared::{AppConfig, AppError};
use std::sync::Arc;
use tracing::info;

/// アプリケーション全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<SessionContext>,
    pub cache: Arc<PostCacheService>,
    pub post_service: Arc<PostService>,
    pub user_service: Arc<UserService>,
    pub post_handler: Arc<PostHandler>,
    pub user_handler: Arc<UserHandler>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let session = Arc::new(SessionContext::new());
        let cache = Arc::new(PostCacheService::new(config.cache.stale_after_secs));
        let post_cache: Arc<dyn PostCache> = cache.clone();

        let post_service = Arc::new(PostService::new(
            Arc::clone(&session),
            Arc::clone(&post_cache),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&session), post_cache));

        let post_handler = Arc::new(PostHandler::new(
            Arc::clone(&post_service),
            Arc::clone(&user_service),
            Arc::clone(&session),
            config.clone(),
        ));
        let user_handler = Arc::new(UserHandler::new(
            Arc::clone(&user_service),
            Arc::clone(&session),
            config.clone(),
        ));

        info!(
            require_photo = config.photo.require_photo,
            stale_after_secs = config.cache.stale_after_secs,
            "application state initialized"
        );

        Ok(Self {
            config,
            session,
            cache,
            post_service,
            user_service,
            post_handler,
            user_handler,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(AppConfig::from_env())
    }
}
