//! 俱乐部聚合

mod club;
pub mod events;
mod repository;

pub use club::*;
pub use repository::*;
