//! PostgreSQL 持久化实现

mod error_mapper;
mod postgres_club_repository;
mod postgres_connection_repository;
mod postgres_file_repository;
mod postgres_session_repository;
mod postgres_user_repository;

pub use error_mapper::*;
pub use postgres_club_repository::*;
pub use postgres_connection_repository::*;
pub use postgres_file_repository::*;
pub use postgres_session_repository::*;
pub use postgres_user_repository::*;
