//! Redis 缓存实现

mod login_attempts;

pub use login_attempts::*;
