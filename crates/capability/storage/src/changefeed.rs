//! 集合变更推送
//!
//! 每个集合一条 `tokio::sync::watch` 通道，值为整集合快照：
//! - 后端在每次提交写入后发布完整集合（不做增量 diff）
//! - `version` 单调递增，作为订阅方的游标
//! - 订阅方只看到最新快照，中间版本可能被合并
//!
//! 各集合相互独立，不保证跨集合的到达顺序。

use crate::models::{ActivityEventRecord, ActorProfile, AssetRecord, RentalRecord};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// 可订阅的集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Actors,
    Assets,
    Rentals,
    ActivityEvents,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Actors,
        Collection::Assets,
        Collection::Rentals,
        Collection::ActivityEvents,
    ];

    /// 集合名（与 Postgres 表名一致，通知负载直接使用）。
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Actors => "actors",
            Collection::Assets => "assets",
            Collection::Rentals => "rentals",
            Collection::ActivityEvents => "activity_events",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|item| item.as_str() == value)
            .ok_or_else(|| format!("unknown collection: {}", value))
    }
}

/// 集合快照。
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub version: u64,
    pub items: Arc<Vec<T>>,
}

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Self {
            version: 0,
            items: Arc::new(Vec::new()),
        }
    }
}

/// 四个集合的发布端。
pub struct ChangeFeed {
    actors: watch::Sender<Snapshot<ActorProfile>>,
    assets: watch::Sender<Snapshot<AssetRecord>>,
    rentals: watch::Sender<Snapshot<RentalRecord>>,
    activity: watch::Sender<Snapshot<ActivityEventRecord>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            actors: watch::Sender::new(Snapshot::empty()),
            assets: watch::Sender::new(Snapshot::empty()),
            rentals: watch::Sender::new(Snapshot::empty()),
            activity: watch::Sender::new(Snapshot::empty()),
        }
    }

    pub fn publish_actors(&self, items: Vec<ActorProfile>) {
        publish(&self.actors, items);
    }

    pub fn publish_assets(&self, items: Vec<AssetRecord>) {
        publish(&self.assets, items);
    }

    pub fn publish_rentals(&self, items: Vec<RentalRecord>) {
        publish(&self.rentals, items);
    }

    pub fn publish_activity(&self, items: Vec<ActivityEventRecord>) {
        publish(&self.activity, items);
    }

    pub fn subscribe_actors(&self) -> watch::Receiver<Snapshot<ActorProfile>> {
        self.actors.subscribe()
    }

    pub fn subscribe_assets(&self) -> watch::Receiver<Snapshot<AssetRecord>> {
        self.assets.subscribe()
    }

    pub fn subscribe_rentals(&self) -> watch::Receiver<Snapshot<RentalRecord>> {
        self.rentals.subscribe()
    }

    pub fn subscribe_activity(&self) -> watch::Receiver<Snapshot<ActivityEventRecord>> {
        self.activity.subscribe()
    }

    /// 当前集合版本（游标）。
    pub fn version(&self, collection: Collection) -> u64 {
        match collection {
            Collection::Actors => self.actors.borrow().version,
            Collection::Assets => self.assets.borrow().version,
            Collection::Rentals => self.rentals.borrow().version,
            Collection::ActivityEvents => self.activity.borrow().version,
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// 无订阅者时同样更新值，后来的订阅者能拿到最新快照。
fn publish<T>(sender: &watch::Sender<Snapshot<T>>, items: Vec<T>) {
    sender.send_modify(|snapshot| {
        snapshot.version = snapshot.version.saturating_add(1);
        snapshot.items = Arc::new(items);
    });
}
