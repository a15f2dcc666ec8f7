//! 认证上下文

mod commands;
mod dto;
mod handlers;
mod queries;
mod query_handlers;

pub use commands::*;
pub use dto::*;
pub use handlers::*;
pub use queries::*;
pub use query_handlers::*;
