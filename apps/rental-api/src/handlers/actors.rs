//! 操作者 handlers
//!
//! - GET /actors：列出操作者（来自同步视图）
//! - POST /actors：新建操作者，仅管理员；未指定角色时为 worker

use crate::AppState;
use crate::middleware::require_actor_context;
use crate::utils::echo::await_echo;
use crate::utils::response::{actor_to_dto, ledger_error};
use crate::utils::validation::parse_optional_role;
use api_contract::{ActorDto, ApiResponse, CreateActorRequest};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rental_ledger::NewActor;

pub async fn list_actors(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_actor_context(&state, &headers) {
        return response;
    }
    let data: Vec<ActorDto> = state
        .sync
        .read(|view| view.actors.clone())
        .into_iter()
        .map(actor_to_dto)
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn create_actor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateActorRequest>,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let role = match parse_optional_role(req.role.as_deref()) {
        Ok(role) => role,
        Err(response) => return response,
    };
    let input = NewActor {
        username: req.username,
        password: req.password,
        role,
    };
    match state.service.actors.create(&ctx, input).await {
        Ok(actor) => {
            let actor_id = actor.actor_id.clone();
            await_echo(&state, "create_actor", |view| {
                view.actors.iter().any(|item| item.actor_id == actor_id)
            })
            .await;
            (StatusCode::OK, Json(ApiResponse::success(actor_to_dto(actor)))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}
