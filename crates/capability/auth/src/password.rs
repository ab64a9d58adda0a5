//! 操作者口令处理
//!
//! 新口令一律存 argon2 哈希；早期录入的明文口令在登录时常量时间比较，
//! 通过后返回新哈希，由调用方回写。

use crate::AuthError;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use subtle::ConstantTimeEq;

const ARGON2_PREFIX: &str = "$argon2";

/// 口令校验结果。`upgrade_hash` 非空表示需要回写。
pub struct PasswordCheck {
    pub verified: bool,
    pub upgrade_hash: Option<String>,
}

impl PasswordCheck {
    fn rejected() -> Self {
        Self {
            verified: false,
            upgrade_hash: None,
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::Internal("password must not be empty".to_string()));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Internal(err.to_string()))
}

pub fn verify_password_and_maybe_upgrade(
    stored: &str,
    password: &str,
) -> Result<PasswordCheck, AuthError> {
    if stored.starts_with(ARGON2_PREFIX) {
        let parsed =
            PasswordHash::new(stored).map_err(|err| AuthError::Internal(err.to_string()))?;
        let verified = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        return Ok(PasswordCheck {
            verified,
            upgrade_hash: None,
        });
    }

    // 空口令永不通过
    if stored.is_empty() {
        return Ok(PasswordCheck::rejected());
    }
    let verified: bool = stored.as_bytes().ct_eq(password.as_bytes()).into();
    if !verified {
        return Ok(PasswordCheck::rejected());
    }
    Ok(PasswordCheck {
        verified: true,
        upgrade_hash: Some(hash_password(password)?),
    })
}
