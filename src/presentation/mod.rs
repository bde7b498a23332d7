pub mod dto;
pub mod format;
pub mod handlers;
