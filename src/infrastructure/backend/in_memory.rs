use crate::application::ports::post_backend::PostBackend;
use crate::domain::entities::{Post, Time, UserProfile, UserRole};
use crate::domain::value_objects::{PostId, PostPhoto, Principal};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Default)]
struct Store {
    next_id: u64,
    last_timestamp: Time,
    posts: BTreeMap<PostId, Post>,
    profiles: HashMap<Principal, UserProfile>,
    roles: HashMap<Principal, UserRole>,
    admin_claimed: bool,
}

impl Store {
    fn allocate_id(&mut self) -> PostId {
        self.next_id += 1;
        PostId::new(self.next_id)
    }

    /// 壁時計が戻っても作成時刻は単調増加させる
    fn now(&mut self) -> Time {
        let wall = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.last_timestamp = wall.max(self.last_timestamp + 1);
        self.last_timestamp
    }

    fn role_of(&self, principal: &Principal) -> UserRole {
        if principal.is_anonymous() {
            return UserRole::Guest;
        }
        self.roles.get(principal).copied().unwrap_or(UserRole::User)
    }

    fn owned_post_mut(&mut self, id: PostId, caller: &Principal) -> Result<&mut Post, AppError> {
        let post = self
            .posts
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;
        if !post.is_authored_by(caller) {
            return Err(AppError::Unauthorized(
                "Only the author can modify this post".to_string(),
            ));
        }
        Ok(post)
    }
}

/// リモート投稿サービスのインメモリ実装
///
/// `connect` で呼び出し元ごとのハンドルを作る。ハンドルは同じストアを共有する。
#[derive(Clone, Default)]
pub struct InMemoryPostBackend {
    store: Arc<Mutex<Store>>,
}

impl InMemoryPostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最初に接続した匿名でない principal が管理者になる
    pub fn connect(&self, principal: Principal) -> Arc<dyn PostBackend> {
        {
            let mut store = lock(&self.store);
            if !principal.is_anonymous() && !store.admin_claimed {
                debug!(principal = %principal, "first caller becomes admin");
                store.roles.insert(principal.clone(), UserRole::Admin);
                store.admin_claimed = true;
            }
        }
        Arc::new(CallerHandle {
            store: Arc::clone(&self.store),
            caller: principal,
        })
    }

    pub fn post_count(&self) -> usize {
        lock(&self.store).posts.len()
    }
}

fn lock(store: &Mutex<Store>) -> MutexGuard<'_, Store> {
    // ストアの更新は途中でパニックしないので、毒化しても中身は一貫している
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

struct CallerHandle {
    store: Arc<Mutex<Store>>,
    caller: Principal,
}

#[async_trait]
impl PostBackend for CallerHandle {
    async fn create_post(&self, title: &str, body: &str, photo: &str) -> Result<PostId, AppError> {
        let mut store = lock(&self.store);
        if !store.role_of(&self.caller).can_post() {
            return Err(AppError::Unauthorized(
                "Guests cannot create posts".to_string(),
            ));
        }
        let id = store.allocate_id();
        let timestamp = store.now();
        let post = Post::new(
            id,
            title.to_string(),
            body.to_string(),
            self.caller.clone(),
            timestamp,
            PostPhoto::from_wire(photo),
        );
        store.posts.insert(id, post);
        Ok(id)
    }

    async fn update_post(
        &self,
        id: PostId,
        title: &str,
        body: &str,
        photo: &str,
    ) -> Result<(), AppError> {
        let mut store = lock(&self.store);
        let post = store.owned_post_mut(id, &self.caller)?;
        post.apply_update(
            title.to_string(),
            body.to_string(),
            PostPhoto::from_wire(photo),
        );
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        let mut store = lock(&self.store);
        store.owned_post_mut(id, &self.caller)?;
        store.posts.remove(&id);
        Ok(())
    }

    async fn get_post(&self, id: PostId) -> Result<Post, AppError> {
        lock(&self.store)
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, AppError> {
        // ID は作成順に振られるので BTreeMap の順序がそのまま古い順
        Ok(lock(&self.store).posts.values().cloned().collect())
    }

    async fn get_posts_by_author(&self, author: &Principal) -> Result<Vec<Post>, AppError> {
        Ok(lock(&self.store)
            .posts
            .values()
            .filter(|post| post.is_authored_by(author))
            .cloned()
            .collect())
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, AppError> {
        Ok(lock(&self.store).profiles.get(&self.caller).cloned())
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), AppError> {
        if self.caller.is_anonymous() {
            return Err(AppError::Unauthorized(
                "Anonymous callers cannot save a profile".to_string(),
            ));
        }
        lock(&self.store)
            .profiles
            .insert(self.caller.clone(), profile);
        Ok(())
    }

    async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>, AppError> {
        Ok(lock(&self.store).profiles.get(user).cloned())
    }

    async fn get_caller_user_role(&self) -> Result<UserRole, AppError> {
        Ok(lock(&self.store).role_of(&self.caller))
    }

    async fn assign_caller_user_role(
        &self,
        user: &Principal,
        role: UserRole,
    ) -> Result<(), AppError> {
        let mut store = lock(&self.store);
        if store.role_of(&self.caller) != UserRole::Admin {
            return Err(AppError::Unauthorized(
                "Only admins can assign roles".to_string(),
            ));
        }
        store.roles.insert(user.clone(), role);
        Ok(())
    }

    async fn is_caller_admin(&self) -> Result<bool, AppError> {
        Ok(lock(&self.store).role_of(&self.caller) == UserRole::Admin)
    }
}
