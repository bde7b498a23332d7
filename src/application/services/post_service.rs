use super::session_service::{SessionClient, SessionContext, SessionSnapshot};
use crate::application::ports::cache::{PostCache, QueryKey};
use crate::domain::entities::Post;
use crate::domain::value_objects::{PostId, PostPhoto, Principal};
use crate::shared::error::AppError;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 投稿のクエリと更新
///
/// 読み込みはセッション単位のキャッシュを通し、更新が成功したら
/// 影響するクエリを無効化してから返す。
#[derive(Clone)]
pub struct PostService {
    session: Arc<SessionContext>,
    cache: Arc<dyn PostCache>,
}

impl PostService {
    pub fn new(session: Arc<SessionContext>, cache: Arc<dyn PostCache>) -> Self {
        Self { session, cache }
    }

    /// サインイン済みならクライアントを返す。セッションが変わっていればキャッシュを破棄する。
    async fn client(&self) -> Option<SessionClient> {
        let SessionSnapshot { generation, state } = self.session.current();
        self.cache.bind_session(generation).await.ok()?;
        state.client().cloned()
    }

    async fn require_client(&self) -> Result<SessionClient, AppError> {
        self.client().await.ok_or(AppError::NoSession)
    }

    /// 新しい順の全投稿。セッションがない場合や取得に失敗した場合は空。
    pub async fn list_posts(&self) -> Vec<Post> {
        match self.try_list_posts().await {
            Ok(posts) => posts,
            Err(AppError::NoSession) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load posts");
                Vec::new()
            }
        }
    }

    /// `list_posts` と同じクエリだが、失敗をそのまま返す
    pub async fn try_list_posts(&self) -> Result<Vec<Post>, AppError> {
        let client = self.require_client().await?;
        let backend = Arc::clone(&client.backend);
        let load = async move {
            let mut posts = backend.get_all_posts().await?;
            // サービスは古い順で返す
            posts.reverse();
            Ok(posts)
        }
        .boxed();
        self.cache.post_list(QueryKey::AllPosts, load).await
    }

    /// 文字列の ID で 1 件取得する。不正な ID・存在しない・取得失敗はすべて `None`。
    pub async fn get_post(&self, id: &str) -> Option<Post> {
        let post_id = match PostId::parse(id) {
            Ok(post_id) => post_id,
            Err(e) => {
                debug!(id = %id, error = %e, "ignoring malformed post id");
                return None;
            }
        };
        match self.get_post_by_id(post_id).await {
            Ok(post) => Some(post),
            Err(AppError::NoSession) => None,
            Err(e) => {
                warn!(post_id = %post_id, error = %e, "failed to load post");
                None
            }
        }
    }

    pub async fn get_post_by_id(&self, id: PostId) -> Result<Post, AppError> {
        let client = self.require_client().await?;
        let backend = Arc::clone(&client.backend);
        let load = async move { backend.get_post(id).await }.boxed();
        self.cache.post(id, load).await
    }

    /// 指定した作成者の投稿を新しい順で返す
    pub async fn get_posts_by_author(&self, author: &Principal) -> Vec<Post> {
        let Some(client) = self.client().await else {
            return Vec::new();
        };
        let backend = Arc::clone(&client.backend);
        let owner = author.clone();
        let load = async move {
            let mut posts = backend.get_posts_by_author(&owner).await?;
            posts.reverse();
            Ok(posts)
        }
        .boxed();
        match self
            .cache
            .post_list(QueryKey::PostsByAuthor(author.clone()), load)
            .await
        {
            Ok(posts) => posts,
            Err(e) => {
                warn!(author = %author, error = %e, "failed to load posts by author");
                Vec::new()
            }
        }
    }

    /// 投稿を作成する。写真が空でもこの層では受け付ける。
    pub async fn create_post(
        &self,
        title: &str,
        body: &str,
        photo: &PostPhoto,
    ) -> Result<PostId, AppError> {
        let client = self.require_client().await?;
        let id = client
            .backend
            .create_post(title, body, &photo.to_wire())
            .await?;
        self.cache.invalidate_post_lists().await;
        info!(post_id = %id, author = %client.principal, "post created");
        Ok(id)
    }

    pub async fn update_post(
        &self,
        id: PostId,
        title: &str,
        body: &str,
        photo: &PostPhoto,
    ) -> Result<(), AppError> {
        let client = self.require_client().await?;
        client
            .backend
            .update_post(id, title, body, &photo.to_wire())
            .await?;
        self.cache.invalidate_post_lists().await;
        self.cache.invalidate(&QueryKey::Post(id)).await;
        info!(post_id = %id, "post updated");
        Ok(())
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        let client = self.require_client().await?;
        client.backend.delete_post(id).await?;
        self.cache.invalidate_post_lists().await;
        self.cache.invalidate(&QueryKey::Post(id)).await;
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// セッションが使えるようになるたび、また一覧が無効化されるたびに最新の一覧を流す
    pub fn watch_feed(&self) -> FeedWatch {
        FeedWatch {
            service: self.clone(),
            session_rx: self.session.subscribe(),
            cache_rx: self.cache.subscribe(),
            primed: false,
        }
    }
}

/// [`PostService::watch_feed`] の購読ハンドル
pub struct FeedWatch {
    service: PostService,
    session_rx: watch::Receiver<SessionSnapshot>,
    cache_rx: watch::Receiver<u64>,
    primed: bool,
}

impl FeedWatch {
    /// 次の一覧。最初の呼び出しはセッションが使えるようになり次第すぐ返る。
    pub async fn next(&mut self) -> Option<Vec<Post>> {
        if self.primed {
            tokio::select! {
                changed = self.session_rx.changed() => changed.ok()?,
                changed = self.cache_rx.changed() => changed.ok()?,
            }
        }

        self.session_rx
            .wait_for(|snapshot| snapshot.state.is_ready())
            .await
            .ok()?;
        self.primed = true;
        // これから取得する一覧がこの時点までの無効化を反映する
        self.cache_rx.borrow_and_update();
        Some(self.service.list_posts().await)
    }
}
