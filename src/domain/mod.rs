pub mod constants;
pub mod entities;
pub mod value_objects;

pub use constants::{ACCEPTED_IMAGE_TYPES, LEGACY_PHOTO_SENTINEL, MAX_PHOTO_BYTES};
pub use entities::{Post, UserProfile, UserRole};
pub use value_objects::{EncodedImage, PostId, PostPhoto, Principal};
