use crate::{
    application::services::{PostService, SessionContext, UserService, photo_codec},
    domain::entities::Post,
    domain::value_objects::{PostId, PostPhoto},
    presentation::dto::{
        ApiResponse, Validate,
        post_dto::{
            EditorOutcome, EditorPhoto, EditorRequest, FeedState, FeedView, PostCardDto,
            PostDetailDto, PostDetailView,
        },
    },
    shared::{AppConfig, AppError, ValidationFailureKind},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

const SAVE_FAILED_MESSAGE: &str = "Failed to save post. Please try again.";
const DELETE_FAILED_MESSAGE: &str = "Failed to delete post. Please try again.";
const PHOTO_REQUIRED_MESSAGE: &str = "Please add a photo to your story";

/// 保存直前の、検証済みの入力
struct PreparedPost {
    post_id: Option<PostId>,
    title: String,
    body: String,
    photo: PostPhoto,
}

pub struct PostHandler {
    post_service: Arc<PostService>,
    user_service: Arc<UserService>,
    session: Arc<SessionContext>,
    config: AppConfig,
}

impl PostHandler {
    pub fn new(
        post_service: Arc<PostService>,
        user_service: Arc<UserService>,
        session: Arc<SessionContext>,
        config: AppConfig,
    ) -> Self {
        Self {
            post_service,
            user_service,
            session,
            config,
        }
    }

    pub async fn feed(&self) -> FeedView {
        self.feed_at(Utc::now()).await
    }

    /// 相対日付の基準時刻を指定して一覧を組み立てる
    pub async fn feed_at(&self, now: DateTime<Utc>) -> FeedView {
        let Some(principal) = self.session.principal() else {
            return FeedView {
                state: FeedState::SignedOut,
                posts: Vec::new(),
                can_create: false,
            };
        };
        let can_create = !principal.is_anonymous();

        let posts = match self.post_service.try_list_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(error = %e, "feed failed to load");
                return FeedView {
                    state: FeedState::Failed,
                    posts: Vec::new(),
                    can_create,
                };
            }
        };

        let state = if posts.is_empty() {
            FeedState::Empty
        } else {
            FeedState::Loaded
        };
        FeedView {
            state,
            posts: posts
                .iter()
                .map(|post| PostCardDto::from_post(post, &self.config.display, now))
                .collect(),
            can_create,
        }
    }

    pub async fn detail(&self, id: &str) -> PostDetailView {
        let Some(post) = self.post_service.get_post(id).await else {
            return PostDetailView::NotFound;
        };
        let is_author = self
            .session
            .principal()
            .is_some_and(|viewer| post.is_authored_by(&viewer));
        let author = self.author_display(&post, is_author).await;
        PostDetailView::Loaded(PostDetailDto::from_post(&post, author, is_author))
    }

    /// 閲覧者が作成者で名前を設定していればその名前、それ以外は短縮した principal
    async fn author_display(&self, post: &Post, is_author: bool) -> String {
        if is_author
            && let Ok(Some(profile)) = self.user_service.caller_profile().await
            && let Some(name) = profile.display_name()
        {
            return name.to_string();
        }
        post.author.truncated(self.config.display.principal_prefix)
    }

    /// エディタの保存。入力は変更しないので、失敗時はそのまま再送できる。
    pub async fn submit_editor(&self, request: &EditorRequest) -> ApiResponse<EditorOutcome> {
        let prepared = match self.prepare(request).await {
            Ok(prepared) => prepared,
            Err(e) => return ApiResponse::from_app_error(e),
        };

        let result = match prepared.post_id {
            Some(id) => self
                .post_service
                .update_post(id, &prepared.title, &prepared.body, &prepared.photo)
                .await
                .map(|()| EditorOutcome {
                    post_id: id.to_string(),
                    created: false,
                    message: "Post updated successfully!".to_string(),
                }),
            None => self
                .post_service
                .create_post(&prepared.title, &prepared.body, &prepared.photo)
                .await
                .map(|id| EditorOutcome {
                    post_id: id.to_string(),
                    created: true,
                    message: "Post created successfully!".to_string(),
                }),
        };

        match result {
            Ok(outcome) => ApiResponse::success(outcome),
            Err(e) => {
                warn!(error = %e, "failed to save post");
                ApiResponse::failure(SAVE_FAILED_MESSAGE, e.code())
            }
        }
    }

    async fn prepare(&self, request: &EditorRequest) -> Result<PreparedPost, AppError> {
        let principal = self.session.principal().ok_or(AppError::NoSession)?;

        let existing = match request.post_id.as_deref() {
            Some(id) => {
                let post = self
                    .post_service
                    .get_post(id)
                    .await
                    .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;
                if !post.is_authored_by(&principal) {
                    return Err(AppError::Unauthorized(
                        "Only the author can edit this post".to_string(),
                    ));
                }
                Some(post)
            }
            None => None,
        };

        request.validate()?;

        let photo = match &request.photo {
            EditorPhoto::Keep => existing
                .as_ref()
                .map(|post| post.photo.clone())
                .unwrap_or_default(),
            EditorPhoto::Remove => PostPhoto::Absent,
            EditorPhoto::Upload(file) => {
                photo_codec::validate(&**file).into_result()?;
                photo_codec::encode(&**file)
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?
                    .into()
            }
        };

        if self.config.photo.require_photo && !photo.is_displayable() {
            return Err(AppError::validation(
                ValidationFailureKind::PhotoRequired,
                PHOTO_REQUIRED_MESSAGE,
            ));
        }

        Ok(PreparedPost {
            post_id: existing.map(|post| post.id),
            title: request.title.trim().to_string(),
            body: request.body.trim().to_string(),
            photo,
        })
    }

    /// 作成者のみ削除できる
    pub async fn delete(&self, id: &str) -> ApiResponse<()> {
        let Some(principal) = self.session.principal() else {
            return ApiResponse::from_app_error(AppError::NoSession);
        };
        let Some(post) = self.post_service.get_post(id).await else {
            return ApiResponse::from_app_error(AppError::NotFound(format!(
                "Post {id} not found"
            )));
        };
        if !post.is_authored_by(&principal) {
            return ApiResponse::from_app_error(AppError::Unauthorized(
                "Only the author can delete this post".to_string(),
            ));
        }

        match self.post_service.delete_post(post.id).await {
            Ok(()) => ApiResponse::success(()),
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "failed to delete post");
                ApiResponse::failure(DELETE_FAILED_MESSAGE, e.code())
            }
        }
    }

    /// ファイル選択ダイアログの accept 属性
    pub fn accepted_image_types(&self) -> String {
        photo_codec::accepted_image_types()
    }
}
