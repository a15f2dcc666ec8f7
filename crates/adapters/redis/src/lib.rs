//! clubnet-adapter-redis - Redis 适配器

mod cache;
mod connection;
mod publisher;

pub use cache::*;
pub use connection::*;
pub use publisher::*;
