//! 运行计数器快照。
//!
//! - GET /metrics

use crate::AppState;
use crate::middleware::require_actor_context;
use crate::utils::response::metrics_to_dto;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rental_telemetry::metrics;

pub async fn get_metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_actor_context(&state, &headers) {
        return response;
    }
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(metrics_to_dto(snapshot))),
    )
        .into_response()
}
