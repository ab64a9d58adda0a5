//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：auth_error, internal_auth_error, ledger_error
//! - DTO 转换：actor_to_dto, asset_to_dto, rental_to_dto, billing_to_dto,
//!   activity_to_dto, stats_to_dto, metrics_to_dto
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码一一对应。

use api_contract::{
    ActivityDto, ActorDto, ApiResponse, AssetDto, BillingDto, MetricsSnapshotDto, RentalDto,
    StatsDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::BillingBreakdown;
use rental_auth::AuthError;
use rental_ledger::LedgerError;
use rental_storage::{ActivityEventRecord, ActorProfile, AssetRecord, RentalRecord};
use rental_sync::DashboardStats;
use rental_telemetry::MetricsSnapshot;
use tracing::warn;

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 租赁核心错误响应，五类错误各有独立的状态码与错误码
pub fn ledger_error(err: LedgerError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(target: "rental.api", code = err.code(), error = %err, "request failed");
    }
    (
        status,
        Json(ApiResponse::<()>::error(err.code(), err.to_string())),
    )
        .into_response()
}

pub fn actor_to_dto(profile: ActorProfile) -> ActorDto {
    ActorDto {
        actor_id: profile.actor_id,
        username: profile.username,
        role: profile.role.to_string(),
        created_at_ms: profile.created_at_ms,
    }
}

pub fn asset_to_dto(record: AssetRecord) -> AssetDto {
    AssetDto {
        asset_id: record.asset_id,
        name: record.name,
        hourly_rate: record.hourly_rate,
        daily_rate: record.daily_rate,
        status: record.status.to_string(),
        service_entry_date_ms: record.service_entry_date_ms,
        total_revenue: record.total_revenue,
    }
}

pub fn rental_to_dto(record: RentalRecord) -> RentalDto {
    RentalDto {
        rental_id: record.rental_id,
        asset_id: record.asset_id,
        asset_name: record.asset_name,
        customer_phone: record.customer_phone,
        guarantee_document: record.guarantee_document,
        start_time_ms: record.start_time_ms,
        end_time_ms: record.end_time_ms,
        total_cost: record.total_cost,
        actor_id: record.actor_id,
        actor_username: record.actor_username,
    }
}

pub fn billing_to_dto(billing: BillingBreakdown) -> BillingDto {
    BillingDto {
        duration_hours: billing.duration_hours,
        full_days: billing.full_days,
        remainder_hours: billing.remainder_hours,
        remainder_cost: billing.remainder_cost,
        total_cost: billing.total_cost,
    }
}

pub fn activity_to_dto(record: ActivityEventRecord) -> ActivityDto {
    ActivityDto {
        event_id: record.event_id,
        ts_ms: record.ts_ms,
        actor_id: record.actor_id,
        actor_username: record.actor_username,
        kind: record.kind.to_string(),
        detail: record.detail,
    }
}

pub fn stats_to_dto(stats: DashboardStats) -> StatsDto {
    StatsDto {
        total_revenue: stats.total_revenue,
        active_rentals: stats.active_rentals,
        available_assets: stats.available_assets,
        total_assets: stats.total_assets,
        maintenance_assets: stats.maintenance_assets,
    }
}

pub fn metrics_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    MetricsSnapshotDto {
        rentals_opened: snapshot.rentals_opened,
        rentals_closed: snapshot.rentals_closed,
        revenue_cents_total: snapshot.revenue_cents_total,
        conflicts: snapshot.conflicts,
        permission_denied: snapshot.permission_denied,
        validation_failures: snapshot.validation_failures,
        not_found: snapshot.not_found,
        store_failures: snapshot.store_failures,
        activity_append_failures: snapshot.activity_append_failures,
        sync_echo_timeouts: snapshot.sync_echo_timeouts,
        ledger_latency_ms_total: snapshot.ledger_latency_ms_total,
        ledger_latency_ms_count: snapshot.ledger_latency_ms_count,
    }
}
