//! 内存存储实现模块
//!
//! 用于本地演示、单元测试与集成测试；未配置数据库时 API 服务也使用它。
//!
//! 包含以下实现：
//! - ActorStore: InMemoryActorStore
//! - AssetStore: InMemoryAssetStore
//! - RentalStore: InMemoryRentalStore（与设备存储共享数据）
//! - ActivityStore: InMemoryActivityStore
//!
//! `InMemoryBackend` 把它们与同一个 ChangeFeed、同一个时钟装配在一起。

pub mod activity;
pub mod actor;
pub mod asset;
pub mod rental;

pub use activity::*;
pub use actor::*;
pub use asset::*;
pub use rental::*;

use crate::changefeed::ChangeFeed;
use crate::clock::{Clock, LocalServerClock, SystemClock};
use crate::traits::Stores;
use std::sync::Arc;

/// 内存后端
pub struct InMemoryBackend {
    pub feed: Arc<ChangeFeed>,
    pub clock: Arc<dyn Clock>,
    pub actors: Arc<InMemoryActorStore>,
    pub assets: Arc<InMemoryAssetStore>,
    pub rentals: Arc<InMemoryRentalStore>,
    pub activity: Arc<InMemoryActivityStore>,
}

impl InMemoryBackend {
    /// 使用系统时钟
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 使用指定时钟（测试中传入 ManualClock）
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let feed = Arc::new(ChangeFeed::new());
        let assets = Arc::new(InMemoryAssetStore::new(feed.clone()));
        Self {
            actors: Arc::new(InMemoryActorStore::new(feed.clone())),
            rentals: Arc::new(InMemoryRentalStore::new(assets.clone(), feed.clone())),
            activity: Arc::new(InMemoryActivityStore::new(clock.clone(), feed.clone())),
            assets,
            clock,
            feed,
        }
    }

    /// 以 trait 对象形式导出
    pub fn stores(&self) -> Stores {
        Stores {
            actors: self.actors.clone(),
            assets: self.assets.clone(),
            rentals: self.rentals.clone(),
            activity: self.activity.clone(),
            clock: Arc::new(LocalServerClock::new(self.clock.clone())),
            feed: self.feed.clone(),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
