//! 租赁 handlers
//!
//! - POST /assets/{id}/rentals：开租
//! - POST /assets/{id}/return：归还并结算，返回计费明细
//! - GET /rentals：租赁记录（同步视图，`active=true` 时只返回未结租记录）

use crate::AppState;
use crate::handlers::assets::AssetPath;
use crate::middleware::require_actor_context;
use crate::utils::echo::await_echo;
use crate::utils::response::{billing_to_dto, ledger_error, rental_to_dto};
use api_contract::{ApiResponse, CloseRentalResponse, OpenRentalRequest, RentalDto};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rental_ledger::OpenRental;

#[derive(Debug, Default, serde::Deserialize)]
pub struct RentalQuery {
    #[serde(default)]
    pub active: Option<bool>,
}

pub async fn list_rentals(
    State(state): State<AppState>,
    Query(query): Query<RentalQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_actor_context(&state, &headers) {
        return response;
    }
    let records = if query.active.unwrap_or(false) {
        state.sync.read(|view| view.active_rentals())
    } else {
        state.sync.read(|view| view.rentals.clone())
    };
    let data: Vec<RentalDto> = records.into_iter().map(rental_to_dto).collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub async fn open_rental(
    State(state): State<AppState>,
    Path(path): Path<AssetPath>,
    headers: HeaderMap,
    Json(req): Json<OpenRentalRequest>,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let input = OpenRental {
        customer_phone: req.customer_phone,
        guarantee_document: req.guarantee_document,
    };
    match state
        .service
        .ledger
        .open_rental(&ctx, &path.asset_id, input)
        .await
    {
        Ok(rental) => {
            let rental_id = rental.rental_id.clone();
            await_echo(&state, "open_rental", |view| {
                view.open_rental(&path.asset_id)
                    .is_some_and(|item| item.rental_id == rental_id)
            })
            .await;
            (StatusCode::OK, Json(ApiResponse::success(rental_to_dto(rental)))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}

pub async fn close_rental(
    State(state): State<AppState>,
    Path(path): Path<AssetPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_actor_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.service.ledger.close_rental(&ctx, &path.asset_id).await {
        Ok(closed) => {
            let rental_id = closed.rental.rental_id.clone();
            await_echo(&state, "close_rental", |view| {
                view.rentals
                    .iter()
                    .any(|item| item.rental_id == rental_id && !item.is_open())
            })
            .await;
            let response = CloseRentalResponse {
                rental: rental_to_dto(closed.rental),
                billing: billing_to_dto(closed.billing),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(err) => ledger_error(err),
    }
}
