//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 操作者模型：ActorRecord, ActorProfile
//! - 设备模型：AssetRecord, AssetUpdate
//! - 租赁模型：RentalRecord, RentalClose
//! - 活动日志模型：ActivityEventRecord, NewActivityEvent

use domain::{ActivityKind, ActorContext, AssetStatus, Role};

/// 操作者记录（含口令哈希，仅存储层与认证使用）。
#[derive(Debug, Clone)]
pub struct ActorRecord {
    pub actor_id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at_ms: i64,
}

impl ActorRecord {
    /// 将操作者记录转换为 ActorContext。
    pub fn to_actor_context(&self) -> ActorContext {
        ActorContext::new(self.actor_id.clone(), self.username.clone(), self.role)
    }

    /// 对外发布的档案（不含口令哈希）。
    pub fn profile(&self) -> ActorProfile {
        ActorProfile {
            actor_id: self.actor_id.clone(),
            username: self.username.clone(),
            role: self.role,
            created_at_ms: self.created_at_ms,
        }
    }
}

/// 操作者档案（变更推送与查询面使用，避免泄露口令字段）。
#[derive(Debug, Clone, PartialEq)]
pub struct ActorProfile {
    pub actor_id: String,
    pub username: String,
    pub role: Role,
    pub created_at_ms: i64,
}

/// 设备记录。
///
/// `total_revenue` 只在归还结算时由存储端原子累加。
/// `retired_at_ms` 非空表示已逻辑删除，不再出现在列表与快照中。
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub asset_id: String,
    pub name: String,
    pub hourly_rate: f64,
    pub daily_rate: f64,
    pub status: AssetStatus,
    pub service_entry_date_ms: i64,
    pub total_revenue: f64,
    pub retired_at_ms: Option<i64>,
}

impl AssetRecord {
    pub fn is_retired(&self) -> bool {
        self.retired_at_ms.is_some()
    }
}

/// 设备更新输入（状态与营收不可经此修改）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetUpdate {
    pub name: Option<String>,
    pub hourly_rate: Option<f64>,
    pub daily_rate: Option<f64>,
}

impl AssetUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.hourly_rate.is_none() && self.daily_rate.is_none()
    }
}

/// 租赁记录。`end_time_ms` 为空即未结租。
///
/// `asset_name` 与 `actor_username` 为开租时的冗余快照，设备改名后不回溯。
#[derive(Debug, Clone, PartialEq)]
pub struct RentalRecord {
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

impl RentalRecord {
    pub fn is_open(&self) -> bool {
        self.end_time_ms.is_none()
    }
}

/// 结租条件写入输入。
///
/// `hourly_rate` / `daily_rate` 为计费时读取的费率，写入时要求设备费率未变。
#[derive(Debug, Clone, PartialEq)]
pub struct RentalClose {
    pub rental_id: String,
    pub asset_id: String,
    pub end_time_ms: i64,
    pub total_cost: f64,
    pub hourly_rate: f64,
    pub daily_rate: f64,
}

/// 活动日志记录（写入后不可变）。
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEventRecord {
    pub event_id: String,
    pub ts_ms: i64,
    pub actor_id: String,
    pub actor_username: String,
    pub kind: ActivityKind,
    pub detail: String,
}

/// 活动日志写入输入，时间戳由存储端分配。
#[derive(Debug, Clone)]
pub struct NewActivityEvent {
    pub event_id: String,
    pub actor_id: String,
    pub actor_username: String,
    pub kind: ActivityKind,
    pub detail: String,
}
