pub mod post_handler;
pub mod user_handler;

pub use post_handler::PostHandler;
pub use user_handler::UserHandler;
