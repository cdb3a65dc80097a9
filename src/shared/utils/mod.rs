/// 공유 유틸리티 모듈
/// Shared Utilities Module
pub mod one_time_token;
pub mod slug;
pub mod templates;

pub use one_time_token::{generate_token, hash_token};
pub use self::slug::slugify;
