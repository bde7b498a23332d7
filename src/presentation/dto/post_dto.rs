use super::Validate;
use crate::application::ports::photo_source::PhotoSource;
use crate::domain::entities::Post;
use crate::presentation::format::{format_date, format_date_time};
use crate::shared::config::DisplayConfig;
use crate::shared::{AppError, ValidationFailureKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// レスポンスDTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCardDto {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub author: String,
    pub date: String,
    pub photo_url: Option<String>,
}

impl PostCardDto {
    pub fn from_post(post: &Post, display: &DisplayConfig, now: DateTime<Utc>) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            preview: post.body_preview(display.preview_chars),
            author: post.author.truncated(display.principal_prefix),
            date: format_date(post.timestamp, now),
            photo_url: post.photo.preview_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    SignedOut,
    Empty,
    Failed,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedView {
    pub state: FeedState,
    pub posts: Vec<PostCardDto>,
    /// "New Post" を出すか
    pub can_create: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetailDto {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub date_time: String,
    pub can_edit: bool,
    pub photo_url: Option<String>,
}

impl PostDetailDto {
    pub fn from_post(post: &Post, author: String, can_edit: bool) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            body: post.body.clone(),
            author,
            date_time: format_date_time(post.timestamp),
            can_edit,
            photo_url: post.photo.preview_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "post", rename_all = "snake_case")]
pub enum PostDetailView {
    NotFound,
    Loaded(PostDetailDto),
}

// リクエストDTO

/// エディタで選ばれた写真の扱い
#[derive(Clone, Default)]
pub enum EditorPhoto {
    /// 編集中の投稿の写真をそのまま使う（新規作成では写真なし）
    #[default]
    Keep,
    Remove,
    Upload(Arc<dyn PhotoSource>),
}

impl fmt::Debug for EditorPhoto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorPhoto::Keep => f.write_str("Keep"),
            EditorPhoto::Remove => f.write_str("Remove"),
            EditorPhoto::Upload(file) => f.debug_tuple("Upload").field(&file.name()).finish(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorRequest {
    /// 編集時のみ
    pub post_id: Option<String>,
    pub title: String,
    pub body: String,
    pub photo: EditorPhoto,
}

impl EditorRequest {
    pub fn create(title: impl Into<String>, body: impl Into<String>, photo: EditorPhoto) -> Self {
        Self {
            post_id: None,
            title: title.into(),
            body: body.into(),
            photo,
        }
    }

    pub fn edit(
        post_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        photo: EditorPhoto,
    ) -> Self {
        Self {
            post_id: Some(post_id.into()),
            title: title.into(),
            body: body.into(),
            photo,
        }
    }
}

impl Validate for EditorRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation(
                ValidationFailureKind::EmptyTitle,
                "Please enter a title",
            ));
        }
        if self.body.trim().is_empty() {
            return Err(AppError::validation(
                ValidationFailureKind::EmptyBody,
                "Please enter some content",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOutcome {
    pub post_id: String,
    pub created: bool,
    pub message: String,
}
