//! 活动日志 handler
//!
//! - GET /activity：全部事件，时间倒序（同步视图）

use crate::AppState;
use crate::middleware::require_actor_context;
use crate::utils::response::activity_to_dto;
use api_contract::{ActivityDto, ApiResponse};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

pub async fn list_activity(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_actor_context(&state, &headers) {
        return response;
    }
    let data: Vec<ActivityDto> = state
        .sync
        .read(|view| view.activity.clone())
        .into_iter()
        .map(activity_to_dto)
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}
