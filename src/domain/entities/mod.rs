pub mod post;
pub mod user;

pub use post::{Post, Time};
pub use user::{UserProfile, UserRole};
