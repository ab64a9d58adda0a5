//! 认证能力：登录、口令哈希、JWT 生成与校验。
//!
//! 认证只负责确认身份并给出 ActorContext，权限判断在 ledger 中完成。

mod jwt;
mod password;

use async_trait::async_trait;
use domain::ActorContext;
use rental_storage::{ActorProfile, ActorStore};
use std::sync::Arc;
use tracing::info;

pub use jwt::JwtManager;
pub use password::{PasswordCheck, hash_password, verify_password_and_maybe_upgrade};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 登录返回的 token 结构。
pub struct AuthTokens {
    pub access_token: String,
    pub expires_at: u64,
}

/// 认证服务实现（基于 ActorStore + JWT）。
pub struct AuthService {
    actor_store: Arc<dyn ActorStore>,
    jwt: JwtManager,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(actor_store: Arc<dyn ActorStore>, jwt: JwtManager) -> Self {
        Self { actor_store, jwt }
    }

    /// 登录校验并签发 token。
    ///
    /// 库中仍为明文的旧口令在首次登录成功后改写为 argon2 哈希。
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(ActorProfile, AuthTokens), AuthError> {
        let actor = self
            .actor_store
            .find_by_username(username)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;
        let check = verify_password_and_maybe_upgrade(&actor.password_hash, password)?;
        if !check.verified {
            return Err(AuthError::InvalidCredentials);
        }
        if let Some(password_hash) = check.upgrade_hash {
            let updated = self
                .actor_store
                .update_password_hash(&actor.actor_id, &password_hash)
                .await
                .map_err(|err| AuthError::Internal(err.to_string()))?;
            if !updated {
                return Err(AuthError::Internal("password migration update failed".to_string()));
            }
            info!(target: "rental.auth", actor_id = %actor.actor_id, "legacy password upgraded");
        }
        let ctx = actor.to_actor_context();
        let tokens = self.jwt.issue_access(&ctx)?;
        Ok((actor.profile(), tokens))
    }

    /// 校验 access token 并提取 ActorContext。
    pub fn verify_access_token(&self, token: &str) -> Result<ActorContext, AuthError> {
        self.jwt.verify_access(token)
    }
}

/// 认证能力 trait，便于替换实现与测试。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(ActorProfile, AuthTokens), AuthError>;
    fn verify_access_token(&self, token: &str) -> Result<ActorContext, AuthError>;
}

#[async_trait]
impl Authenticator for AuthService {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(ActorProfile, AuthTokens), AuthError> {
        self.login(username, password).await
    }

    fn verify_access_token(&self, token: &str) -> Result<ActorContext, AuthError> {
        self.verify_access_token(token)
    }
}
