pub mod photo_codec;
pub mod post_service;
pub mod session_service;
pub mod user_service;

pub use photo_codec::{PhotoCodecError, PhotoData, PhotoRejection, PhotoValidation};
pub use post_service::{FeedWatch, PostService};
pub use session_service::{SessionClient, SessionContext, SessionSnapshot, SessionState};
pub use user_service::UserService;
