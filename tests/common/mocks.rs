use async_trait::async_trait;
use mockall::mock;

use family_blog_lib::application::ports::post_backend::PostBackend;
use family_blog_lib::domain::entities::{Post, UserProfile, UserRole};
use family_blog_lib::domain::value_objects::{PostId, Principal};
use family_blog_lib::shared::error::AppError;

mock! {
    pub Backend {}

    #[async_trait]
    impl PostBackend for Backend {
        async fn create_post(&self, title: &str, body: &str, photo: &str) -> Result<PostId, AppError>;
        async fn update_post(
            &self,
            id: PostId,
            title: &str,
            body: &str,
            photo: &str,
        ) -> Result<(), AppError>;
        async fn delete_post(&self, id: PostId) -> Result<(), AppError>;
        async fn get_post(&self, id: PostId) -> Result<Post, AppError>;
        async fn get_all_posts(&self) -> Result<Vec<Post>, AppError>;
        async fn get_posts_by_author(&self, author: &Principal) -> Result<Vec<Post>, AppError>;
        async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, AppError>;
        async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), AppError>;
        async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>, AppError>;
        async fn get_caller_user_role(&self) -> Result<UserRole, AppError>;
        async fn assign_caller_user_role(
            &self,
            user: &Principal,
            role: UserRole,
        ) -> Result<(), AppError>;
        async fn is_caller_admin(&self) -> Result<bool, AppError>;
    }
}
