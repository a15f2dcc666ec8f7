//! 用户聚合

pub mod events;
mod lockout;
mod password;
mod repository;
mod role;
mod user;
mod value_objects;

pub use lockout::*;
pub use password::*;
pub use repository::*;
pub use role::*;
pub use user::*;
pub use value_objects::*;
