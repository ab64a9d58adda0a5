//! 存储接口 Trait 定义
//!
//! 定义所有集合存储的异步接口：
//! - ActorStore：操作者存储
//! - AssetStore：设备存储（含状态条件迁移）
//! - RentalStore：租赁存储（开租/结租条件事务）
//! - ActivityStore：活动日志（仅追加）
//! - ServerClock：存储端时钟
//!
//! 设计原则：
//! - 所有接口返回 StorageError，仅表示存储不可用
//! - 条件写入的谓词失败通过 `bool` / `Option` 表达，由上层映射为冲突
//! - 涉及设备状态的写入只能通过条件接口完成，不提供无条件改状态
//! - 使用 async_trait 支持动态分发

use crate::changefeed::ChangeFeed;
use crate::error::StorageError;
use crate::models::{
    ActivityEventRecord, ActorRecord, AssetRecord, AssetUpdate, NewActivityEvent, RentalClose,
    RentalRecord,
};
use async_trait::async_trait;
use domain::AssetStatus;
use std::sync::Arc;

/// 操作者存储接口
#[async_trait]
pub trait ActorStore: Send + Sync {
    /// 列出全部操作者
    async fn list_actors(&self) -> Result<Vec<ActorRecord>, StorageError>;

    /// 根据用户名查找操作者（等值查询，仅用于登录）
    async fn find_by_username(&self, username: &str)
    -> Result<Option<ActorRecord>, StorageError>;

    /// 创建操作者；用户名已存在时返回 `None`
    async fn create_actor(&self, record: ActorRecord)
    -> Result<Option<ActorRecord>, StorageError>;

    /// 更新口令哈希（旧口令迁移）
    async fn update_password_hash(
        &self,
        actor_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;
}

/// 设备存储接口
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// 列出未删除的设备
    async fn list_assets(&self) -> Result<Vec<AssetRecord>, StorageError>;

    /// 查找指定设备（已删除视为不存在）
    async fn find_asset(&self, asset_id: &str) -> Result<Option<AssetRecord>, StorageError>;

    /// 创建新设备
    async fn create_asset(&self, record: AssetRecord) -> Result<AssetRecord, StorageError>;

    /// 更新名称/费率；设备不存在返回 `None`
    async fn update_asset(
        &self,
        asset_id: &str,
        update: AssetUpdate,
    ) -> Result<Option<AssetRecord>, StorageError>;

    /// 条件迁移：仅当当前状态为 `from` 时改为 `to`
    async fn transition_status(
        &self,
        asset_id: &str,
        from: AssetStatus,
        to: AssetStatus,
    ) -> Result<bool, StorageError>;

    /// 逻辑删除：仅当设备存在且未处于出租状态
    async fn retire_asset(&self, asset_id: &str, retired_at_ms: i64)
    -> Result<bool, StorageError>;
}

/// 租赁存储接口
///
/// 开租与结租同时涉及设备与租赁两个集合，必须由存储端在一次事务内完成。
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// 列出全部租赁记录
    async fn list_rentals(&self) -> Result<Vec<RentalRecord>, StorageError>;

    /// 查找设备当前未结租的记录
    async fn find_open_rental(&self, asset_id: &str)
    -> Result<Option<RentalRecord>, StorageError>;

    /// 条件开租：设备 Available 且无未结租记录时，插入记录并置为 Rented
    async fn open_rental(&self, record: RentalRecord) -> Result<bool, StorageError>;

    /// 条件结租：记录未结租、设备 Rented 且费率未变时，
    /// 写入结束时间与费用、设备置为 Available、营收原子累加
    async fn close_rental(&self, close: &RentalClose)
    -> Result<Option<RentalRecord>, StorageError>;

    /// 手动解除 Rented：仅当没有任何未结租记录引用该设备
    async fn release_rented(&self, asset_id: &str, to: AssetStatus)
    -> Result<bool, StorageError>;
}

/// 活动日志存储接口（仅追加）
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// 追加事件，时间戳由存储端分配
    async fn append_event(
        &self,
        event: NewActivityEvent,
    ) -> Result<ActivityEventRecord, StorageError>;

    /// 按时间倒序列出事件
    async fn list_events(&self) -> Result<Vec<ActivityEventRecord>, StorageError>;
}

/// 存储端时钟：开租/结租时间以存储端为准
#[async_trait]
pub trait ServerClock: Send + Sync {
    async fn server_time_ms(&self) -> Result<i64, StorageError>;
}

/// 一套完整的存储后端（供 ledger 与 API 装配）。
#[derive(Clone)]
pub struct Stores {
    pub actors: Arc<dyn ActorStore>,
    pub assets: Arc<dyn AssetStore>,
    pub rentals: Arc<dyn RentalStore>,
    pub activity: Arc<dyn ActivityStore>,
    pub clock: Arc<dyn ServerClock>,
    pub feed: Arc<ChangeFeed>,
}
