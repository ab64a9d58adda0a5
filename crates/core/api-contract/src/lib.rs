//! 稳定的 DTO 与 API 响应契约。
//!
//! 字段统一 camelCase；时间为 Unix 毫秒，金额为两位小数的实数。
//! 状态与角色以小写字符串传输（`available` / `rented` / `maintenance`，`manager` / `worker`）。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应体。`expires` 为 access token 过期时间（Unix 毫秒）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires: u64,
    pub actor_id: String,
    pub username: String,
    pub role: String,
}

/// 新建操作者请求体，未给出角色时为 worker。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActorRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// 操作者（不含口令）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDto {
    pub actor_id: String,
    pub username: String,
    pub role: String,
    pub created_at_ms: i64,
}

/// 新建设备请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    pub name: String,
    pub hourly_rate: f64,
    pub daily_rate: f64,
}

/// 修改设备请求体（部分字段）。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub daily_rate: Option<f64>,
}

/// 手动修改状态请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: String,
}

/// 设备列表查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetQuery {
    #[serde(default)]
    pub status: Option<String>,
    /// 名称子串
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDto {
    pub asset_id: String,
    pub name: String,
    pub hourly_rate: f64,
    pub daily_rate: f64,
    pub status: String,
    pub service_entry_date_ms: i64,
    pub total_revenue: f64,
}

/// 开租请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRentalRequest {
    pub customer_phone: String,
    pub guarantee_document: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalDto {
    pub rental_id: String,
    pub asset_id: String,
    pub asset_name: String,
    pub customer_phone: String,
    pub guarantee_document: String,
    pub start_time_ms: i64,
    pub end_time_ms: Option<i64>,
    pub total_cost: Option<f64>,
    pub actor_id: String,
    pub actor_username: String,
}

/// 计费明细。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDto {
    pub duration_hours: f64,
    pub full_days: f64,
    pub remainder_hours: f64,
    pub remainder_cost: f64,
    pub total_cost: f64,
}

/// 归还响应体。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRentalResponse {
    pub rental: RentalDto,
    pub billing: BillingDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub event_id: String,
    pub ts_ms: i64,
    pub actor_id: String,
    pub actor_username: String,
    pub kind: String,
    pub detail: String,
}

/// 看板统计。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total_revenue: f64,
    pub active_rentals: usize,
    pub available_assets: usize,
    pub total_assets: usize,
    pub maintenance_assets: usize,
}

/// 运行计数器快照。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub rentals_opened: u64,
    pub rentals_closed: u64,
    pub revenue_cents_total: u64,
    pub conflicts: u64,
    pub permission_denied: u64,
    pub validation_failures: u64,
    pub not_found: u64,
    pub store_failures: u64,
    pub activity_append_failures: u64,
    pub sync_echo_timeouts: u64,
    pub ledger_latency_ms_total: u64,
    pub ledger_latency_ms_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_envelope_has_no_data() {
        let value = serde_json::to_value(ApiResponse::<()>::error("RESOURCE.CONFLICT", "busy"))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "data": null,
                "error": { "code": "RESOURCE.CONFLICT", "message": "busy" }
            })
        );
    }

    #[test]
    fn open_rental_dto_uses_camel_case() {
        let dto = RentalDto {
            rental_id: "r-1".to_string(),
            asset_id: "a-1".to_string(),
            asset_name: "Drill".to_string(),
            customer_phone: "555".to_string(),
            guarantee_document: "ID-9".to_string(),
            start_time_ms: 1_000,
            end_time_ms: None,
            total_cost: None,
            actor_id: "u-1".to_string(),
            actor_username: "alice".to_string(),
        };
        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(value["customerPhone"], "555");
        assert_eq!(value["startTimeMs"], 1_000);
        assert!(value["endTimeMs"].is_null());
        assert!(value["totalCost"].is_null());
    }

    #[test]
    fn update_request_fields_are_optional() {
        let req: UpdateAssetRequest = serde_json::from_value(json!({ "dailyRate": 80.0 })).unwrap();
        assert_eq!(req.name, None);
        assert_eq!(req.hourly_rate, None);
        assert_eq!(req.daily_rate, Some(80.0));
    }

    #[test]
    fn create_actor_role_defaults_to_none() {
        let req: CreateActorRequest =
            serde_json::from_value(json!({ "username": "bob", "password": "pw" })).unwrap();
        assert!(req.role.is_none());
    }
}
