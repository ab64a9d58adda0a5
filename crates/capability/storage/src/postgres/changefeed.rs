//! Postgres 变更推送
//!
//! 表触发器在每条语句后执行 `pg_notify('rental_changes', <表名>)`，
//! 监听任务收到通知后按表整集合重载并发布到 ChangeFeed。
//!
//! 单个任务顺序处理通知，每次重载读取的都是最新已提交状态，
//! 因此同一集合的快照版本不会倒退。监听连接断开时重连并全量重载。

use crate::changefeed::{ChangeFeed, Collection};
use crate::error::StorageError;
use crate::postgres::{PgActivityStore, PgActorStore, PgAssetStore, PgRentalStore};
use crate::traits::{ActivityStore, ActorStore, AssetStore, RentalStore};
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 通知通道名
pub const CHANGE_CHANNEL: &str = "rental_changes";

/// 启动监听任务
pub fn spawn_pg_changefeed(pool: PgPool, feed: Arc<ChangeFeed>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(err) = listen_once(&pool, &feed).await {
                warn!(target: "rental.storage", error = %err, "changefeed listener failed");
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
}

async fn listen_once(pool: &PgPool, feed: &ChangeFeed) -> Result<(), StorageError> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGE_CHANNEL).await?;
    // 先 LISTEN 再全量加载，避免错过两者之间的提交
    reload_all(pool, feed).await?;
    loop {
        let notification = listener.recv().await?;
        match notification.payload().parse::<Collection>() {
            Ok(collection) => {
                debug!(target: "rental.storage", %collection, "change notification");
                reload(pool, feed, collection).await?;
            }
            Err(err) => {
                warn!(target: "rental.storage", error = %err, "unknown change notification");
            }
        }
    }
}

/// 全量重载四个集合
pub async fn reload_all(pool: &PgPool, feed: &ChangeFeed) -> Result<(), StorageError> {
    for collection in Collection::ALL {
        reload(pool, feed, collection).await?;
    }
    Ok(())
}

/// 重载单个集合并发布快照
pub async fn reload(
    pool: &PgPool,
    feed: &ChangeFeed,
    collection: Collection,
) -> Result<(), StorageError> {
    match collection {
        Collection::Actors => {
            let actors = PgActorStore::new(pool.clone()).list_actors().await?;
            feed.publish_actors(actors.iter().map(|item| item.profile()).collect());
        }
        Collection::Assets => {
            let assets = PgAssetStore::new(pool.clone()).list_assets().await?;
            feed.publish_assets(assets);
        }
        Collection::Rentals => {
            let rentals = PgRentalStore::new(pool.clone()).list_rentals().await?;
            feed.publish_rentals(rentals);
        }
        Collection::ActivityEvents => {
            let events = PgActivityStore::new(pool.clone()).list_events().await?;
            feed.publish_activity(events);
        }
    }
    Ok(())
}
