//! Admin API - 俱乐部管理后台
//!
//! 俱乐部、俱乐部关系、用户管理与关系图谱

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod state;
