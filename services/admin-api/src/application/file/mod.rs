//! 文件上下文

mod commands;
mod handlers;
mod queries;
mod query_handlers;

pub use commands::*;
pub use handlers::*;
pub use queries::*;
pub use query_handlers::*;
