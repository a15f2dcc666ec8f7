//! REST 路由模块

pub mod auth;
pub mod clubs;
pub mod connections;
pub mod dashboard;
pub mod files;
pub mod graph;
pub mod users;
