//! 仪表盘上下文

mod queries;
mod query_handlers;

pub use queries::*;
pub use query_handlers::*;
