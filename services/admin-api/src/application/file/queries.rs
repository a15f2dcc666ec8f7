//! 文件查询定义

use clubnet_cqrs_core::Query;

use crate::domain::file::StoredFile;

/// 获取文件元数据查询
#[derive(Debug, Clone)]
pub struct GetFileQuery {
    pub file_id: String,
}

impl Query for GetFileQuery {
    type Result = StoredFile;
}

/// 下载文件内容查询
#[derive(Debug, Clone)]
pub struct GetFileContentQuery {
    pub file_id: String,
}

/// 下载结果
#[derive(Clone)]
pub struct FileDownload {
    pub meta: StoredFile,
    pub content: Vec<u8>,
}

impl Query for GetFileContentQuery {
    type Result = FileDownload;
}
