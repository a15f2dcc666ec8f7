//! 密码服务（argon2）

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use clubnet_errors::{AppError, AppResult};

/// 密码哈希与校验
pub struct PasswordService;

impl PasswordService {
    /// 最短密码长度
    pub const MIN_LENGTH: usize = 8;

    /// 校验密码强度
    pub fn check_strength(plain: &str) -> AppResult<()> {
        if plain.len() < Self::MIN_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                Self::MIN_LENGTH
            )));
        }
        if plain.len() > 128 {
            return Err(AppError::validation(
                "Password cannot exceed 128 characters",
            ));
        }
        Ok(())
    }

    /// 生成 argon2id 哈希
    pub fn hash_password(plain: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
    }

    /// 校验密码
    pub fn verify_password(plain: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("correct horse battery").unwrap();
        assert!(PasswordService::verify_password("correct horse battery", &hash).unwrap());
        assert!(!PasswordService::verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = PasswordService::hash_password("same password").unwrap();
        let b = PasswordService::hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_strength_check() {
        assert!(PasswordService::check_strength("short").is_err());
        assert!(PasswordService::check_strength("long enough password").is_ok());
    }
}
