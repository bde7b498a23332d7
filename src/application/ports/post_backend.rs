use crate::domain::entities::{Post, UserProfile, UserRole};
use crate::domain::value_objects::{PostId, Principal};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// リモート投稿サービスのポート
///
/// 呼び出し元（principal）に紐づいたハンドルとして実装される。
/// `photo` は空文字列・`"legacy"`・data URL のいずれかをそのまま運ぶ。
#[async_trait]
pub trait PostBackend: Send + Sync {
    async fn create_post(&self, title: &str, body: &str, photo: &str) -> Result<PostId, AppError>;

    async fn update_post(
        &self,
        id: PostId,
        title: &str,
        body: &str,
        photo: &str,
    ) -> Result<(), AppError>;

    async fn delete_post(&self, id: PostId) -> Result<(), AppError>;

    /// 存在しない場合はエラー
    async fn get_post(&self, id: PostId) -> Result<Post, AppError>;

    /// 作成時刻の古い順
    async fn get_all_posts(&self) -> Result<Vec<Post>, AppError>;

    /// 作成時刻の古い順
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
