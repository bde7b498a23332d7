mod common;

use common::mocks::MockBackend;
use common::{ALICE, BOB, Fixture, principal};
use family_blog_lib::AppState;
use family_blog_lib::application::ports::post_backend::PostBackend;
use family_blog_lib::domain::entities::UserProfile;
use family_blog_lib::domain::value_objects::PostPhoto;
use family_blog_lib::infrastructure::storage::InMemoryPhoto;
use family_blog_lib::presentation::dto::post_dto::{
    EditorPhoto, EditorRequest, FeedState, PostDetailView,
};
use family_blog_lib::presentation::dto::user_dto::SaveProfileRequest;
use family_blog_lib::shared::{AppConfig, AppError};
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn upload(name: &str, content_type: &str, len: usize) -> EditorPhoto {
    EditorPhoto::Upload(Arc::new(InMemoryPhoto::new(
        name,
        content_type,
        vec![0x42; len],
    )))
}

fn optional_photo_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.photo.require_photo = false;
    config
}

#[tokio::test]
async fn editor_requires_photo_but_service_does_not() {
    let fx = Fixture::with_defaults();

    let request = EditorRequest::create("Reunion", "We had fun", EditorPhoto::Keep);
    let response = fx.state.post_handler.submit_editor(&request).await;
    assert!(!response.success);
    assert_eq!(response.error_code.as_deref(), Some("VALIDATION_ERROR"));
    assert_eq!(fx.backend.calls.create_post.load(Ordering::SeqCst), 0);

    let id = fx
        .state
        .post_service
        .create_post("Reunion", "We had fun", &PostPhoto::Absent)
        .await
        .unwrap();
    let stored = fx.state.post_service.get_post(&id.to_string()).await.unwrap();
    assert_eq!(stored.photo, PostPhoto::Absent);
    assert_eq!(
        fx.backend.get_post(id).await.unwrap().photo.to_wire(),
        ""
    );
}

#[tokio::test]
async fn blank_title_and_body_are_rejected_before_submission() {
    let fx = Fixture::signed_in(optional_photo_config());

    let response = fx
        .state
        .post_handler
        .submit_editor(&EditorRequest::create("   ", "body", EditorPhoto::Keep))
        .await;
    assert_eq!(response.error.as_deref(), Some("Please enter a title"));

    let response = fx
        .state
        .post_handler
        .submit_editor(&EditorRequest::create("Title", "\n\t", EditorPhoto::Keep))
        .await;
    assert_eq!(response.error.as_deref(), Some("Please enter some content"));

    assert_eq!(fx.backend.calls.create_post.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_uploads_are_rejected_with_user_messages() {
    let fx = Fixture::with_defaults();

    let too_big = EditorRequest::create(
        "Reunion",
        "We had fun",
        upload("big.jpg", "image/jpeg", 6 * 1024 * 1024),
    );
    let response = fx.state.post_handler.submit_editor(&too_big).await;
    assert_eq!(
        response.error.as_deref(),
        Some("Image file size must be less than 5MB")
    );

    let bitmap = EditorRequest::create(
        "Reunion",
        "We had fun",
        upload("a.bmp", "image/bmp", 10),
    );
    let response = fx.state.post_handler.submit_editor(&bitmap).await;
    assert_eq!(
        response.error.as_deref(),
        Some("Please select a valid image file (JPEG, PNG, GIF, or WebP)")
    );

    assert_eq!(fx.backend.calls.create_post.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_upload_is_encoded_and_shown_in_detail() {
    let fx = Fixture::with_defaults();
    let request = EditorRequest::create(
        "  Reunion  ",
        "We had fun",
        upload("photo.png", "image/png", 1024 * 1024),
    );

    let response = fx.state.post_handler.submit_editor(&request).await;
    let outcome = response.data.expect("post saved");
    assert!(outcome.created);
    assert_eq!(outcome.message, "Post created successfully!");

    match fx.state.post_handler.detail(&outcome.post_id).await {
        PostDetailView::Loaded(detail) => {
            assert_eq!(detail.title, "Reunion");
            assert!(detail.can_edit);
            let url = detail.photo_url.expect("photo preview");
            assert!(url.starts_with("data:image/png;base64,"));
        }
        PostDetailView::NotFound => panic!("created post should load"),
    }

    let feed = fx.state.post_handler.feed().await;
    assert_eq!(feed.state, FeedState::Loaded);
    assert_eq!(feed.posts[0].id, outcome.post_id);
}

#[tokio::test]
async fn editing_keeps_existing_photo() {
    let fx = Fixture::with_defaults();
    let photo = PostPhoto::from_wire("data:image/gif;base64,R0lGODlh");
    let id = fx
        .state
        .post_service
        .create_post("Picnic", "Sunny", &photo)
        .await
        .unwrap();

    let request = EditorRequest::edit(
        id.to_string(),
        "Picnic",
        "Rainy after all",
        EditorPhoto::Keep,
    );
    let outcome = fx
        .state
        .post_handler
        .submit_editor(&request)
        .await
        .data
        .expect("update succeeds");
    assert!(!outcome.created);

    let post = fx.state.post_service.get_post(&id.to_string()).await.unwrap();
    assert_eq!(post.body, "Rainy after all");
    assert_eq!(post.photo, photo);
}

#[tokio::test]
async fn editing_legacy_post_without_new_photo_requires_upload() {
    let fx = Fixture::with_defaults();
    let id = fx
        .backend
        .create_post("Old times", "Before photos", "legacy")
        .await
        .unwrap();

    let request = EditorRequest::edit(id.to_string(), "Old times", "Still", EditorPhoto::Keep);
    let response = fx.state.post_handler.submit_editor(&request).await;
    assert!(!response.success);
    assert_eq!(fx.backend.calls.update_post.load(Ordering::SeqCst), 0);

    let request = EditorRequest::edit(
        id.to_string(),
        "Old times",
        "Still",
        upload("new.webp", "image/webp", 64),
    );
    assert!(fx.state.post_handler.submit_editor(&request).await.success);
}

#[tokio::test]
async fn save_failure_keeps_draft_for_retry() {
    let fx = Fixture::signed_in(optional_photo_config());
    let draft = EditorRequest::create("Reunion", "We had fun", EditorPhoto::Keep);

    fx.backend.fail_writes(true);
    let response = fx.state.post_handler.submit_editor(&draft).await;
    assert_eq!(
        response.error.as_deref(),
        Some("Failed to save post. Please try again.")
    );
    assert_eq!(response.error_code.as_deref(), Some("NETWORK_ERROR"));

    fx.backend.fail_writes(false);
    let response = fx.state.post_handler.submit_editor(&draft).await;
    assert!(response.success);
    assert_eq!(fx.backend.calls.create_post.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn editor_requires_session() {
    let state = AppState::new(AppConfig::default()).unwrap();
    let response = state
        .post_handler
        .submit_editor(&EditorRequest::create("t", "b", EditorPhoto::Keep))
        .await;
    assert_eq!(response.error_code.as_deref(), Some("NO_SESSION"));
    assert_eq!(response.error.as_deref(), Some("Please sign in to continue."));
}

#[tokio::test]
async fn only_author_can_edit_or_delete() {
    let fx = Fixture::signed_in(optional_photo_config());
    let bob = fx.store.connect(principal(BOB));
    let bobs_post = bob.create_post("Bob's", "post", "").await.unwrap();

    let response = fx
        .state
        .post_handler
        .submit_editor(&EditorRequest::edit(
            bobs_post.to_string(),
            "Hijack",
            "nope",
            EditorPhoto::Keep,
        ))
        .await;
    assert_eq!(response.error_code.as_deref(), Some("UNAUTHORIZED"));

    let response = fx.state.post_handler.delete(&bobs_post.to_string()).await;
    assert_eq!(response.error_code.as_deref(), Some("UNAUTHORIZED"));

    match fx.state.post_handler.detail(&bobs_post.to_string()).await {
        PostDetailView::Loaded(detail) => {
            assert!(!detail.can_edit);
            assert_eq!(detail.author, "ryjl3-ty...");
        }
        PostDetailView::NotFound => panic!("post exists"),
    }
}

#[tokio::test]
async fn delete_removes_post_and_reports_failures() {
    let fx = Fixture::signed_in(optional_photo_config());
    let id = fx.seed_post("temporary").await;

    fx.backend.fail_writes(true);
    let response = fx.state.post_handler.delete(&id.to_string()).await;
    assert_eq!(
        response.error.as_deref(),
        Some("Failed to delete post. Please try again.")
    );

    fx.backend.fail_writes(false);
    assert!(fx.state.post_handler.delete(&id.to_string()).await.success);
    assert_eq!(
        fx.state.post_handler.detail(&id.to_string()).await,
        PostDetailView::NotFound
    );
    assert_eq!(fx.state.post_handler.feed().await.state, FeedState::Empty);
}

#[tokio::test]
async fn feed_states_follow_session_and_fetch_outcome() {
    let fx = Fixture::signed_in(optional_photo_config());

    fx.backend.fail_reads(true);
    let feed = fx.state.post_handler.feed().await;
    assert_eq!(feed.state, FeedState::Failed);
    assert!(feed.can_create);

    fx.backend.fail_reads(false);
    assert_eq!(fx.state.post_handler.feed().await.state, FeedState::Empty);

    fx.state.session.sign_out();
    let feed = fx.state.post_handler.feed().await;
    assert_eq!(feed.state, FeedState::SignedOut);
    assert!(!feed.can_create);
}

#[tokio::test]
async fn detail_shows_own_profile_name_for_author() {
    let fx = Fixture::signed_in(optional_photo_config());
    let id = fx.seed_post("mine").await;

    let saved = fx
        .state
        .user_handler
        .save_profile(SaveProfileRequest {
            name: " Grandma ".to_string(),
        })
        .await;
    assert!(saved.success);

    match fx.state.post_handler.detail(&id.to_string()).await {
        PostDetailView::Loaded(detail) => assert_eq!(detail.author, "Grandma"),
        PostDetailView::NotFound => panic!("post exists"),
    }

    let identity = fx.state.user_handler.identity().await.unwrap();
    assert_eq!(identity.display_name, "Grandma");
    assert_eq!(identity.principal, ALICE);
    assert_eq!(identity.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn identity_falls_back_to_truncated_principal() {
    let fx = Fixture::with_defaults();
    let identity = fx.state.user_handler.identity().await.unwrap();
    assert_eq!(identity.display_name, "rrkah-fq...");
    assert_eq!(
        fx.state.user_service.caller_profile().await.unwrap(),
        None::<UserProfile>
    );
}

#[tokio::test]
async fn backend_errors_surface_as_save_failure_and_not_found() {
    let state = AppState::new(optional_photo_config()).unwrap();
    let mut backend = MockBackend::new();
    backend
        .expect_create_post()
        .times(1)
        .returning(|_, _, _| Err(AppError::Unauthorized("guest".to_string())));
    backend
        .expect_get_post()
        .returning(|id| Err(AppError::Network(format!("timeout fetching {id}"))));
    state.session.sign_in(principal(ALICE), Arc::new(backend));

    let response = state
        .post_handler
        .submit_editor(&EditorRequest::create("Reunion", "We had fun", EditorPhoto::Keep))
        .await;
    assert_eq!(
        response.error.as_deref(),
        Some("Failed to save post. Please try again.")
    );

    assert_eq!(state.post_handler.detail("7").await, PostDetailView::NotFound);
}

#[tokio::test]
async fn unsupported_upload_is_a_validation_error() {
    let fx = Fixture::with_defaults();
    let response = fx
        .state
        .post_handler
        .submit_editor(&EditorRequest::create(
            "Reunion",
            "We had fun",
            upload("doc.pdf", "application/pdf", 10),
        ))
        .await;
    assert!(!response.success);
    assert_eq!(response.error_code.as_deref(), Some("VALIDATION_ERROR"));
    assert_eq!(fx.backend.calls.create_post.load(Ordering::SeqCst), 0);
}
