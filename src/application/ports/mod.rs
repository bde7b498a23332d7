pub mod cache;
pub mod photo_source;
pub mod post_backend;

pub use cache::{Loader, PostCache, QueryKey};
pub use photo_source::PhotoSource;
pub use post_backend::PostBackend;
