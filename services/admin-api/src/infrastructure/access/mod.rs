//! 授权协作者实现

mod rbac_decider;

pub use rbac_decider::*;
