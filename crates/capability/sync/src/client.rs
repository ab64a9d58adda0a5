//! 客户端本地视图
//!
//! 每个集合一个订阅，收到快照后整体替换本地对应集合并重新排序。
//! 没有乐观更新：自己发起的写操作也要等回显后才在视图中可见。

use crate::projection::{
    AssetFilter, DashboardStats, sort_activity, sort_actors, sort_assets, sort_rentals,
};
use crate::subscription::{SubscriptionHandle, subscribe};
use rental_storage::{
    ActivityEventRecord, ActorProfile, AssetRecord, ChangeFeed, Collection, RentalRecord,
    Snapshot,
};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tracing::trace;

/// 各集合已应用的快照版本。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewVersions {
    pub actors: u64,
    pub assets: u64,
    pub rentals: u64,
    pub activity: u64,
}

impl ViewVersions {
    pub fn get(&self, collection: Collection) -> u64 {
        match collection {
            Collection::Actors => self.actors,
            Collection::Assets => self.assets,
            Collection::Rentals => self.rentals,
            Collection::ActivityEvents => self.activity,
        }
    }
}

/// 本地视图（已排序）。
#[derive(Debug, Clone, Default)]
pub struct LocalView {
    pub actors: Vec<ActorProfile>,
    pub assets: Vec<AssetRecord>,
    pub rentals: Vec<RentalRecord>,
    pub activity: Vec<ActivityEventRecord>,
    pub versions: ViewVersions,
}

impl LocalView {
    pub fn asset(&self, asset_id: &str) -> Option<&AssetRecord> {
        self.assets.iter().find(|asset| asset.asset_id == asset_id)
    }

    pub fn open_rental(&self, asset_id: &str) -> Option<&RentalRecord> {
        self.rentals
            .iter()
            .find(|rental| rental.asset_id == asset_id && rental.is_open())
    }

    pub fn active_rentals(&self) -> Vec<RentalRecord> {
        self.rentals
            .iter()
            .filter(|rental| rental.is_open())
            .cloned()
            .collect()
    }

    pub fn filter_assets(&self, filter: &AssetFilter) -> Vec<AssetRecord> {
        filter.apply(&self.assets)
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.assets, &self.rentals)
    }
}

/// 同步客户端。释放时取消全部订阅。
pub struct SyncClient {
    view: Arc<RwLock<LocalView>>,
    revision: Arc<watch::Sender<u64>>,
    _subscriptions: Vec<SubscriptionHandle>,
}

impl SyncClient {
    /// 订阅四个集合。需要在 tokio 运行时内调用。
    pub fn connect(feed: &ChangeFeed) -> Self {
        let view = Arc::new(RwLock::new(LocalView::default()));
        let revision = Arc::new(watch::Sender::new(0u64));

        let subscriptions = vec![
            subscribe(
                feed.subscribe_actors(),
                applier(&view, &revision, Collection::Actors, apply_actors),
            ),
            subscribe(
                feed.subscribe_assets(),
                applier(&view, &revision, Collection::Assets, apply_assets),
            ),
            subscribe(
                feed.subscribe_rentals(),
                applier(&view, &revision, Collection::Rentals, apply_rentals),
            ),
            subscribe(
                feed.subscribe_activity(),
                applier(&view, &revision, Collection::ActivityEvents, apply_activity),
            ),
        ];

        Self {
            view,
            revision,
            _subscriptions: subscriptions,
        }
    }

    /// 当前视图的拷贝。
    pub fn view(&self) -> LocalView {
        self.read(LocalView::clone)
    }

    /// 在读锁内访问视图。
    pub fn read<R>(&self, f: impl FnOnce(&LocalView) -> R) -> R {
        let guard = self.view.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// 视图整体修订号，任一集合快照应用后加一。
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// 等待视图满足条件，超时返回 `false`。
    pub async fn wait_until(
        &self,
        timeout: Duration,
        predicate: impl Fn(&LocalView) -> bool,
    ) -> bool {
        let mut changes = self.revision.subscribe();
        let waiting = async {
            loop {
                if self.read(&predicate) {
                    return true;
                }
                if changes.changed().await.is_err() {
                    return false;
                }
            }
        };
        tokio::time::timeout(timeout, waiting)
            .await
            .unwrap_or(false)
    }

    /// 等待指定集合至少应用到 `version`。
    pub async fn wait_for_version(
        &self,
        collection: Collection,
        version: u64,
        timeout: Duration,
    ) -> bool {
        self.wait_until(timeout, |view| view.versions.get(collection) >= version)
            .await
    }
}

fn applier<T, F>(
    view: &Arc<RwLock<LocalView>>,
    revision: &Arc<watch::Sender<u64>>,
    collection: Collection,
    apply: F,
) -> impl FnMut(Snapshot<T>) + Send + 'static
where
    T: Send + Sync + 'static,
    F: Fn(&mut LocalView, &Snapshot<T>) + Send + 'static,
{
    let view = view.clone();
    let revision = revision.clone();
    move |snapshot| {
        {
            let mut guard = view.write().unwrap_or_else(PoisonError::into_inner);
            apply(&mut guard, &snapshot);
        }
        trace!(target: "rental.sync", %collection, version = snapshot.version, "snapshot applied");
        revision.send_modify(|value| *value = value.wrapping_add(1));
    }
}

fn apply_actors(view: &mut LocalView, snapshot: &Snapshot<ActorProfile>) {
    let mut items = snapshot.items.as_ref().clone();
    sort_actors(&mut items);
    view.actors = items;
    view.versions.actors = snapshot.version;
}

fn apply_assets(view: &mut LocalView, snapshot: &Snapshot<AssetRecord>) {
    let mut items = snapshot.items.as_ref().clone();
    sort_assets(&mut items);
    view.assets = items;
    view.versions.assets = snapshot.version;
}

fn apply_rentals(view: &mut LocalView, snapshot: &Snapshot<RentalRecord>) {
    let mut items = snapshot.items.as_ref().clone();
    sort_rentals(&mut items);
    view.rentals = items;
    view.versions.rentals = snapshot.version;
}

fn apply_activity(view: &mut LocalView, snapshot: &Snapshot<ActivityEventRecord>) {
    let mut items = snapshot.items.as_ref().clone();
    sort_activity(&mut items);
    view.activity = items;
    view.versions.activity = snapshot.version;
}
