use crate::domain::entities::{Post, UserProfile};
use crate::domain::value_objects::{PostId, Principal};
use crate::shared::error::AppError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use tokio::sync::watch;

/// キャッシュエントリのキー。(クエリ種別, ID) ごとに 1 エントリ。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    AllPosts,
    Post(PostId),
    PostsByAuthor(Principal),
    CallerProfile,
}

impl QueryKey {
    /// 投稿一覧系のキーか（作成・更新・削除でまとめて無効化される）
    pub fn is_post_list(&self) -> bool {
        matches!(self, QueryKey::AllPosts | QueryKey::PostsByAuthor(_))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::AllPosts => write!(f, "posts"),
            QueryKey::Post(id) => write!(f, "post:{id}"),
            QueryKey::PostsByAuthor(author) => write!(f, "posts_by_author:{author}"),
            QueryKey::CallerProfile => write!(f, "caller_profile"),
        }
    }
}

/// キャッシュミス時に実行される取得処理
pub type Loader<'a, T> = BoxFuture<'a, Result<T, AppError>>;

/// セッション単位のリードスルーキャッシュのポート
///
/// 同じキーへの同時読み込みは 1 回の取得にまとめられる。
/// 無効化より前に始まった取得の結果はキャッシュに入らない。
#[async_trait]
pub trait PostCache: Send + Sync {
    /// 一覧系クエリ（`AllPosts` / `PostsByAuthor`）
    async fn post_list(
        &self,
        key: QueryKey,
        load: Loader<'_, Vec<Post>>,
    ) -> Result<Vec<Post>, AppError>;

    async fn post(&self, id: PostId, load: Loader<'_, Post>) -> Result<Post, AppError>;

    async fn caller_profile(
        &self,
        load: Loader<'_, Option<UserProfile>>,
    ) -> Result<Option<UserProfile>, AppError>;

    /// エントリを古いものとして扱い、購読者に通知する
    async fn invalidate(&self, key: &QueryKey);

    /// 一覧系のエントリをすべて無効化する
    async fn invalidate_post_lists(&self);

    /// より新しいセッションの世代であればキャッシュを破棄して紐づけ直す
    ///
    /// 紐づいている世代より古い場合は `NoSession` を返す。
    async fn bind_session(&self, generation: u64) -> Result<(), AppError>;

    async fn clear(&self);

    /// 無効化のたびに値が進むチャネル
    fn subscribe(&self) -> watch::Receiver<u64>;
}
