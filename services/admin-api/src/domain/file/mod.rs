//! 文件聚合

mod repository;
mod stored_file;

pub use repository::*;
pub use stored_file::*;
