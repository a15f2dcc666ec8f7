//! 会话聚合

mod repository;
mod session;

pub use repository::*;
pub use session::*;
