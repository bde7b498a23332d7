use super::coalesce::{FetchTicket, Flight, QueryCoalescer};
use crate::application::ports::cache::QueryKey;
use crate::shared::error::AppError;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone)]
struct CacheEntry<T> {
    data: T,
    fetched_at: Instant,
}

struct CacheState<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
    generations: HashMap<QueryKey, u64>,
    epoch: u64,
}

impl<T> CacheState<T> {
    fn ticket(&self, key: &QueryKey) -> FetchTicket {
        FetchTicket {
            epoch: self.epoch,
            generation: self.generations.get(key).copied().unwrap_or_default(),
        }
    }
}

/// クエリ結果のリードスルーキャッシュ
pub struct QueryCache<T: Clone> {
    state: RwLock<CacheState<T>>,
    coalescer: QueryCoalescer<T>,
    stale_after: Option<Duration>,
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `stale_after` が `None` の場合、エントリは無効化されるまで新鮮
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                generations: HashMap::new(),
                epoch: 0,
            }),
            coalescer: QueryCoalescer::new(),
            stale_after,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<T>) -> bool {
        match self.stale_after {
            Some(ttl) => entry.fetched_at.elapsed() < ttl,
            None => true,
        }
    }

    /// 新鮮なエントリがあれば返す
    pub async fn get(&self, key: &QueryKey) -> Option<T> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.data.clone())
    }

    /// キャッシュから返すか、`load` を実行して結果を保存する
    ///
    /// 同じキーへの同時読み込みは 1 回の取得を共有し、失敗も全員に返る。
    /// `load` が失敗した場合は何も保存しない。
    pub async fn get_or_load<F>(&self, key: &QueryKey, load: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>> + Send,
    {
        loop {
            if let Some(data) = self.get(key).await {
                debug!(key = %key, "query cache hit");
                return Ok(data);
            }

            let ticket = self.state.read().await.ticket(key);
            let leader = match self.coalescer.join(key, ticket) {
                Flight::Leader(leader) => leader,
                Flight::Follower(follower) => {
                    debug!(key = %key, "joining in-flight fetch");
                    match follower.wait().await {
                        Some(outcome) => return outcome,
                        // リーダーが破棄されたので取得をやり直す
                        None => continue,
                    }
                }
            };

            // join までの間に別の取得が完了していればその結果を使う
            if let Some(data) = self.get(key).await {
                let outcome = Ok(data);
                leader.complete(&outcome);
                return outcome;
            }

            debug!(key = %key, "query cache miss");
            let outcome = load.await;
            if let Ok(data) = &outcome {
                self.store(key, ticket, data).await;
            }
            leader.complete(&outcome);
            return outcome;
        }
    }

    async fn store(&self, key: &QueryKey, ticket: FetchTicket, data: &T) {
        let mut state = self.state.write().await;
        if state.ticket(key) == ticket {
            state.entries.insert(
                key.clone(),
                CacheEntry {
                    data: data.clone(),
                    fetched_at: Instant::now(),
                },
            );
        } else {
            debug!(key = %key, "discarding result of fetch that raced an invalidation");
        }
    }

    /// エントリを削除し、進行中の取得結果も保存されないようにする
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut state = self.state.write().await;
        state.entries.remove(key);
        *state.generations.entry(key.clone()).or_default() += 1;
    }

    /// 条件に合うキーをすべて無効化する
    pub async fn invalidate_where<P>(&self, predicate: P)
    where
        P: Fn(&QueryKey) -> bool,
    {
        let mut state = self.state.write().await;
        let keys: Vec<QueryKey> = state
            .entries
            .keys()
            .chain(state.generations.keys())
            .filter(|key| predicate(key))
            .cloned()
            .collect();
        for key in keys {
            state.entries.remove(&key);
            *state.generations.entry(key).or_default() += 1;
        }
    }

    /// 全エントリを破棄する。進行中の取得結果も保存されない。
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.generations.clear();
        state.epoch += 1;
    }

    pub async fn size(&self) -> usize {
        let state = self.state.read().await;
        state.entries.len()
    }
}
