//! 设备 handlers
//!
//! - GET /assets：设备列表（同步视图，支持 `status` 与名称子串 `q` 过滤）
//! - POST /assets：新建设备
//! - PUT /assets/{id}：修改名称或费率
//! - DELETE /assets/{id}：逻辑删除，出租中返回 409
//! - PUT /assets/{id}/status：手动修改状态，不允许置为 rented
//!
//! 写接口全部为管理员操作，权限在 ledger 中判断。

use crate::AppState;
use crate::middleware::require_actor_context;
use crate::utils::echo::await_echo;
use crate::utils::response::{asset_to_dto, ledger_error};
use crate::utils::validation::{parse_optional_status, parse_status};
use api_contract::{
    ApiResponse, AssetDto, AssetQuery, CreateAssetRequest, SetStatusRequest, UpdateAssetRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rental_ledger::NewAsset;
use rental_storage::AssetUpdate;
use rental_sync::AssetFilter;

#[derive(serde::Deserialize)]
pub struct AssetPath {
    pub(crate) asset_id: String,
}

pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_actor_context(&state, &headers) {
        return response;
    }
    let status = match parse_optional_status(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let filter = AssetFilter {
        status,
        name_query: query.q,
    };
    let data: Vec<AssetDto> = state
        .sync
        .read(|view| view.filter_assets(&filter))
        .into_iter()
        .map(asset_to_dto)
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn create_asset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAssetRequest>,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let input = NewAsset {
        name: req.name,
        hourly_rate: req.hourly_rate,
        daily_rate: req.daily_rate,
    };
    match state.service.registry.create(&ctx, input).await {
        Ok(asset) => {
            let asset_id = asset.asset_id.clone();
            await_echo(&state, "create_asset", |view| view.asset(&asset_id).is_some()).await;
            (StatusCode::OK, Json(ApiResponse::success(asset_to_dto(asset)))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}

pub async fn update_asset(
    State(state): State<AppState>,
    Path(path): Path<AssetPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateAssetRequest>,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let update = AssetUpdate {
        name: req.name,
        hourly_rate: req.hourly_rate,
        daily_rate: req.daily_rate,
    };
    match state
        .service
        .registry
        .update(&ctx, &path.asset_id, update)
        .await
    {
        Ok(asset) => {
            let expected = asset.clone();
            await_echo(&state, "update_asset", |view| {
                view.asset(&expected.asset_id).is_some_and(|item| {
                    item.name == expected.name
                        && item.hourly_rate == expected.hourly_rate
                        && item.daily_rate == expected.daily_rate
                })
            })
            .await;
            (StatusCode::OK, Json(ApiResponse::success(asset_to_dto(asset)))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}

pub async fn delete_asset(
    State(state): State<AppState>,
    Path(path): Path<AssetPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.service.registry.delete(&ctx, &path.asset_id).await {
        Ok(()) => {
            await_echo(&state, "delete_asset", |view| view.asset(&path.asset_id).is_none()).await;
            (StatusCode::OK, Json(ApiResponse::success(()))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}

pub async fn set_asset_status(
    State(state): State<AppState>,
    Path(path): Path<AssetPath>,
    headers: HeaderMap,
    Json(req): Json<SetStatusRequest>,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let status = match parse_status(&req.status) {
        Ok(status) => status,
        Err(response) => return response,
    };
    match state
        .service
        .registry
        .set_status(&ctx, &path.asset_id, status)
        .await
    {
        Ok(asset) => {
            await_echo(&state, "set_asset_status", |view| {
                view.asset(&path.asset_id)
                    .is_some_and(|item| item.status == status)
            })
            .await;
            (StatusCode::OK, Json(ApiResponse::success(asset_to_dto(asset)))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}
