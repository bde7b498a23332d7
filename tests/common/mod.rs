#![allow(dead_code)]

pub mod mocks;

use async_trait::async_trait;
use family_blog_lib::AppState;
use family_blog_lib::application::ports::post_backend::PostBackend;
use family_blog_lib::domain::entities::{Post, UserProfile, UserRole};
use family_blog_lib::domain::value_objects::{PostId, Principal};
use family_blog_lib::infrastructure::backend::InMemoryPostBackend;
use family_blog_lib::shared::{AppConfig, AppError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, watch};

pub const ALICE: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";
pub const BOB: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";

pub fn principal(value: &str) -> Principal {
    Principal::new(value.to_string()).expect("valid principal")
}

#[derive(Default)]
pub struct CallCounts {
    pub get_all_posts: AtomicUsize,
    pub get_post: AtomicUsize,
    pub create_post: AtomicUsize,
    pub update_post: AtomicUsize,
    pub delete_post: AtomicUsize,
    pub get_caller_user_profile: AtomicUsize,
}

impl CallCounts {
    pub fn list_fetches(&self) -> usize {
        self.get_all_posts.load(Ordering::SeqCst)
    }

    pub fn post_fetches(&self) -> usize {
        self.get_post.load(Ordering::SeqCst)
    }
}

/// インメモリ実装をラップし、呼び出し回数の記録と失敗の注入、読み込みの一時停止を行う
pub struct RecordingBackend {
    inner: Arc<dyn PostBackend>,
    pub calls: CallCounts,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gate: watch::Sender<bool>,
    fetch_started: Notify,
}

impl RecordingBackend {
    pub fn new(inner: Arc<dyn PostBackend>) -> Arc<Self> {
        let (gate, _) = watch::channel(false);
        Arc::new(Self {
            inner,
            calls: CallCounts::default(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            gate,
            fetch_started: Notify::new(),
        })
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 以降の一覧・単体取得は、データを読んだ後 `release_reads` まで返らない
    pub fn hold_reads(&self) {
        self.gate.send_replace(true);
    }

    pub fn release_reads(&self) {
        self.gate.send_replace(false);
    }

    /// 取得がゲートに到達するまで待つ
    pub async fn read_started(&self) {
        self.fetch_started.notified().await;
    }

    async fn pause_if_held(&self) {
        let mut gate = self.gate.subscribe();
        let held = *gate.borrow_and_update();
        if held {
            self.fetch_started.notify_one();
            let _ = gate.wait_for(|held| !*held).await;
        }
    }

    fn check_read(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Network("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Network("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostBackend for RecordingBackend {
    async fn create_post(&self, title: &str, body: &str, photo: &str) -> Result<PostId, AppError> {
        self.calls.create_post.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.inner.create_post(title, body, photo).await
    }

    async fn update_post(
        &self,
        id: PostId,
        title: &str,
        body: &str,
        photo: &str,
    ) -> Result<(), AppError> {
        self.calls.update_post.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.inner.update_post(id, title, body, photo).await
    }

    async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        self.calls.delete_post.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;
        self.inner.delete_post(id).await
    }

    async fn get_post(&self, id: PostId) -> Result<Post, AppError> {
        self.calls.get_post.fetch_add(1, Ordering::SeqCst);
        let post = self.inner.get_post(id).await;
        self.pause_if_held().await;
        self.check_read()?;
        post
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, AppError> {
        self.calls.get_all_posts.fetch_add(1, Ordering::SeqCst);
        let posts = self.inner.get_all_posts().await;
        self.pause_if_held().await;
        self.check_read()?;
        posts
    }

    async fn get_posts_by_author(&self, author: &Principal) -> Result<Vec<Post>, AppError> {
        self.check_read()?;
        self.inner.get_posts_by_author(author).await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, AppError> {
        self.calls
            .get_caller_user_profile
            .fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.inner.get_caller_user_profile().await
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), AppError> {
        self.check_write()?;
        self.inner.save_caller_user_profile(profile).await
    }

    async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>, AppError> {
        self.check_read()?;
        self.inner.get_user_profile(user).await
    }

    async fn get_caller_user_role(&self) -> Result<UserRole, AppError> {
        self.inner.get_caller_user_role().await
    }

    async fn assign_caller_user_role(
        &self,
        user: &Principal,
        role: UserRole,
    ) -> Result<(), AppError> {
        self.check_write()?;
        self.inner.assign_caller_user_role(user, role).await
    }

    async fn is_caller_admin(&self) -> Result<bool, AppError> {
        self.inner.is_caller_admin().await
    }
}

pub struct Fixture {
    pub state: AppState,
    pub store: InMemoryPostBackend,
    pub backend: Arc<RecordingBackend>,
}

impl Fixture {
    /// ALICE としてサインイン済みの状態を作る
    pub fn signed_in(config: AppConfig) -> Self {
        let state = AppState::new(config).expect("valid config");
        let store = InMemoryPostBackend::new();
        let backend = RecordingBackend::new(store.connect(principal(ALICE)));
        state.session.sign_in(principal(ALICE), backend.clone());
        Self {
            state,
            store,
            backend,
        }
    }

    pub fn with_defaults() -> Self {
        Self::signed_in(AppConfig::default())
    }

    /// サービス層を通さずに直接投稿を作る
    pub async fn seed_post(&self, title: &str) -> PostId {
        self.backend
            .create_post(title, "seeded body", "")
            .await
            .expect("seed post")
    }
}
