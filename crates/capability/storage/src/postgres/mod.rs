//! # PostgreSQL 存储实现模块
//!
//! 生产环境使用的存储后端。
//!
//! ## 包含的实现
//!
//! - **ActorStore** (`actor.rs`)：操作者存储，用户名唯一
//! - **AssetStore** (`asset.rs`)：设备存储，状态条件迁移、逻辑删除
//! - **RentalStore** (`rental.rs`)：开租/结租事务
//! - **ActivityStore** (`activity.rs`)：活动日志，时间戳由数据库分配
//! - **ServerClock** (`clock.rs`)：以数据库时间作为存储端时钟
//! - **变更推送** (`changefeed.rs`)：LISTEN/NOTIFY 驱动的集合重载
//!
//! ## 数据库模式
//!
//! 表结构见 `migrations/0001_init.sql`，`PgBackend::migrate` 可重复执行。
//!
//! ## 并发约束
//!
//! - 所有状态相关写入带谓词，以 `rows_affected` 判断是否成立
//! - `idx_rentals_open_asset` 部分唯一索引保证每台设备最多一条未结租记录
//! - 所有 SQL 使用参数绑定

pub mod activity;
pub mod actor;
pub mod asset;
pub mod changefeed;
pub mod clock;
pub mod rental;

pub use activity::*;
pub use actor::*;
pub use asset::*;
pub use changefeed::*;
pub use clock::*;
pub use rental::*;

use crate::changefeed::ChangeFeed;
use crate::connection::connect_pool;
use crate::error::StorageError;
use crate::traits::Stores;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 建表脚本
pub const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

/// Postgres 后端
pub struct PgBackend {
    pub pool: PgPool,
    pub feed: Arc<ChangeFeed>,
}

impl PgBackend {
    /// 建立连接池
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = connect_pool(database_url, max_connections).await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            feed: Arc::new(ChangeFeed::new()),
        }
    }

    /// 执行建表脚本
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// 启动 LISTEN/NOTIFY 监听任务
    pub fn spawn_changefeed(&self) -> JoinHandle<()> {
        spawn_pg_changefeed(self.pool.clone(), self.feed.clone())
    }

    /// 以 trait 对象形式导出
    pub fn stores(&self) -> Stores {
        Stores {
            actors: Arc::new(PgActorStore::new(self.pool.clone())),
            assets: Arc::new(PgAssetStore::new(self.pool.clone())),
            rentals: Arc::new(PgRentalStore::new(self.pool.clone())),
            activity: Arc::new(PgActivityStore::new(self.pool.clone())),
            clock: Arc::new(PgServerClock::new(self.pool.clone())),
            feed: self.feed.clone(),
        }
    }
}
