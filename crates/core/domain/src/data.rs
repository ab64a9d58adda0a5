use std::fmt;
use std::str::FromStr;

/// 操作者角色（创建后不可变）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Worker => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Role::Manager),
            "worker" => Ok(Role::Worker),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// 设备状态。
///
/// 状态机：
/// - Available → Rented：仅由开租触发
/// - Rented → Available：仅由归还触发
/// - Available ↔ Maintenance：管理员手动切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetStatus {
    Available,
    Rented,
    Maintenance,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "available",
            AssetStatus::Rented => "rented",
            AssetStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(AssetStatus::Available),
            "rented" => Ok(AssetStatus::Rented),
            "maintenance" => Ok(AssetStatus::Maintenance),
            other => Err(format!("unknown asset status: {}", other)),
        }
    }
}

/// 活动日志事件类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    RentOpened,
    RentClosed,
    AssetAdded,
    AssetUpdated,
    AssetDeleted,
    ActorAdded,
    StatusChanged,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::RentOpened => "RENT_OPENED",
            ActivityKind::RentClosed => "RENT_CLOSED",
            ActivityKind::AssetAdded => "ASSET_ADDED",
            ActivityKind::AssetUpdated => "ASSET_UPDATED",
            ActivityKind::AssetDeleted => "ASSET_DELETED",
            ActivityKind::ActorAdded => "ACTOR_ADDED",
            ActivityKind::StatusChanged => "STATUS_CHANGED",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "RENT_OPENED" => Ok(ActivityKind::RentOpened),
            "RENT_CLOSED" => Ok(ActivityKind::RentClosed),
            "ASSET_ADDED" => Ok(ActivityKind::AssetAdded),
            "ASSET_UPDATED" => Ok(ActivityKind::AssetUpdated),
            "ASSET_DELETED" => Ok(ActivityKind::AssetDeleted),
            "ACTOR_ADDED" => Ok(ActivityKind::ActorAdded),
            "STATUS_CHANGED" => Ok(ActivityKind::StatusChanged),
            other => Err(format!("unknown activity kind: {}", other)),
        }
    }
}
