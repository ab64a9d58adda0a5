//! 认证相关 handlers：健康检查与登录
//!
//! - `GET /health`：健康检查，返回 `{"ok": true}`
//! - `POST /login`：校验用户名口令，签发 access token
//!
//! token 中携带 actor_id、username、role，后续请求凭此构造 ActorContext。

use crate::AppState;
use crate::utils::response::{auth_error, internal_auth_error};
use api_contract::{ApiResponse, LoginRequest, LoginResponse};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rental_auth::AuthError;
use tracing::info;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 用户登录
///
/// 口令错误与用户不存在返回同一个 401，不区分原因。
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.username, &req.password).await {
        Ok((actor, tokens)) => {
            info!(target: "rental.api", actor_id = %actor.actor_id, "login succeeded");
            let response = LoginResponse {
                access_token: tokens.access_token,
                expires: tokens.expires_at.saturating_mul(1000),
                actor_id: actor.actor_id,
                username: actor.username,
                role: actor.role.to_string(),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(err) => internal_auth_error(err),
    }
}
