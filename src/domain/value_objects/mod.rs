pub mod photo;
pub mod post_id;
pub mod principal;

pub use photo::{EncodedImage, PostPhoto, is_displayable};
pub use post_id::PostId;
pub use principal::{Principal, truncate_principal};
