//! 操作者 access token。
//!
//! HS256 签名，claims 携带 actor_id（`sub`）、用户名与角色，
//! 校验时固定签发方并检查过期，解析结果直接是 ActorContext。

use crate::{AuthError, AuthTokens};
use domain::{ActorContext, Role};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const ISSUER: &str = "rental-ledger";

#[derive(Debug, Serialize, Deserialize)]
struct ActorClaims {
    sub: String,
    username: String,
    role: String,
    iss: String,
    iat: u64,
    exp: u64,
}

/// token 签发与校验，密钥在构造时派生一次。
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: String, access_ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl_seconds,
        }
    }

    /// 为操作者签发 access token，`expires_at` 为 Unix 秒。
    pub fn issue_access(&self, ctx: &ActorContext) -> Result<AuthTokens, AuthError> {
        let issued_at = now_epoch_seconds();
        let expires_at = issued_at.saturating_add(self.access_ttl_seconds);
        let claims = ActorClaims {
            sub: ctx.actor_id.clone(),
            username: ctx.username.clone(),
            role: ctx.role.as_str().to_string(),
            iss: ISSUER.to_string(),
            iat: issued_at,
            exp: expires_at,
        };
        let access_token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
                .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(AuthTokens {
            access_token,
            expires_at,
        })
    }

    /// 校验签名、签发方与过期时间，还原 ActorContext。
    pub fn verify_access(&self, token: &str) -> Result<ActorContext, AuthError> {
        let claims = jsonwebtoken::decode::<ActorClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?
            .claims;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AuthError::TokenInvalid)?;
        Ok(ActorContext::new(claims.sub, claims.username, role))
    }
}

fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
