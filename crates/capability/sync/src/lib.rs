//! # Rental Sync
//!
//! 同步层的订阅端：
//! - `subscribe`：按集合订阅快照，返回可释放的句柄
//! - `SyncClient`：维护客户端本地视图，提供排序投影与等待回显
//! - `projection`：排序、过滤与看板统计
//!
//! 各集合之间不保证到达顺序，需要跨集合关联时以记录上的时间字段为准。

pub mod client;
pub mod projection;
pub mod subscription;

pub use client::{LocalView, SyncClient, ViewVersions};
pub use projection::{
    AssetFilter, DashboardStats, sort_activity, sort_actors, sort_assets, sort_rentals,
};
pub use subscription::{SubscriptionHandle, subscribe};
