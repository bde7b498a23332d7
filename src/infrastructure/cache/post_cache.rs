use super::query_cache::QueryCache;
use crate::application::ports::cache::{Loader, PostCache, QueryKey};
use crate::domain::entities::{Post, UserProfile};
use crate::domain::value_objects::PostId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

/// セッションに紐づくインメモリのクエリキャッシュ
pub struct PostCacheService {
    lists: QueryCache<Vec<Post>>,
    posts: QueryCache<Post>,
    profiles: QueryCache<Option<UserProfile>>,
    bound_generation: Mutex<Option<u64>>,
    epoch: watch::Sender<u64>,
}

impl PostCacheService {
    /// `stale_after_secs` が 0 の場合は無効化されるまで新鮮なまま
    pub fn new(stale_after_secs: u64) -> Self {
        let stale_after = (stale_after_secs > 0).then(|| Duration::from_secs(stale_after_secs));
        let (epoch, _) = watch::channel(0);
        Self {
            lists: QueryCache::new(stale_after),
            posts: QueryCache::new(stale_after),
            profiles: QueryCache::new(stale_after),
            bound_generation: Mutex::new(None),
            epoch,
        }
    }

    fn notify(&self) {
        self.epoch.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
    }

    pub async fn size(&self) -> usize {
        self.lists.size().await + self.posts.size().await + self.profiles.size().await
    }
}

impl Default for PostCacheService {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl PostCache for PostCacheService {
    async fn post_list(
        &self,
        key: QueryKey,
        load: Loader<'_, Vec<Post>>,
    ) -> Result<Vec<Post>, AppError> {
        if !key.is_post_list() {
            return Err(AppError::Internal(format!("{key} is not a post list query")));
        }
        self.lists.get_or_load(&key, load).await
    }

    async fn post(&self, id: PostId, load: Loader<'_, Post>) -> Result<Post, AppError> {
        self.posts.get_or_load(&QueryKey::Post(id), load).await
    }

    async fn caller_profile(
        &self,
        load: Loader<'_, Option<UserProfile>>,
    ) -> Result<Option<UserProfile>, AppError> {
        self.profiles
            .get_or_load(&QueryKey::CallerProfile, load)
            .await
    }

    async fn invalidate(&self, key: &QueryKey) {
        debug!(key = %key, "invalidating query");
        match key {
            QueryKey::AllPosts | QueryKey::PostsByAuthor(_) => self.lists.invalidate(key).await,
            QueryKey::Post(_) => self.posts.invalidate(key).await,
            QueryKey::CallerProfile => self.profiles.invalidate(key).await,
        }
        self.notify();
    }

    async fn invalidate_post_lists(&self) {
        debug!("invalidating all post list queries");
        self.lists.invalidate_where(QueryKey::is_post_list).await;
        // 一度も読まれていない AllPosts も、進行中の取得があれば止める
        self.lists.invalidate(&QueryKey::AllPosts).await;
        self.notify();
    }

    async fn bind_session(&self, generation: u64) -> Result<(), AppError> {
        let mut bound = self.bound_generation.lock().await;
        match *bound {
            Some(current) if current == generation => Ok(()),
            Some(current) if current > generation => {
                debug!(generation, current, "rejecting read from a previous session");
                Err(AppError::NoSession)
            }
            previous => {
                if previous.is_some() {
                    info!(generation, "session changed, clearing query cache");
                }
                self.clear().await;
                *bound = Some(generation);
                Ok(())
            }
        }
    }

    async fn clear(&self) {
        self.lists.clear().await;
        self.posts.clear().await;
        self.profiles.clear().await;
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }
}
