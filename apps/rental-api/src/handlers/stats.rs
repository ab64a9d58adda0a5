//! 看板统计 handler
//!
//! - GET /stats：总营收、在租数、可用数/总数、维护数

use crate::AppState;
use crate::middleware::require_actor_context;
use crate::utils::response::stats_to_dto;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

pub async fn get_stats(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_actor_context(&state, &headers) {
        return response;
    }
    let stats = state.sync.read(|view| view.stats());
    (StatusCode::OK, Json(ApiResponse::success(stats_to_dto(stats)))).into_response()
}
