//! sqlx 错误到 AppError 的映射

use clubnet_errors::AppError;

/// 将 sqlx 错误转换为 AppError
///
/// 唯一约束冲突映射为 Conflict，外键冲突映射为 FailedPrecondition
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => return AppError::conflict("Resource already exists"),
            // foreign_key_violation
            Some("23503") => {
                return AppError::failed_precondition("Referenced resource is in use");
            }
            _ => {}
        }
    }
    AppError::database(e.to_string())
}
