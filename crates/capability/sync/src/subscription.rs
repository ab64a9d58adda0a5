//! 集合订阅
//!
//! `subscribe` 立即推送当前快照，之后每次集合变化推送一次整集合快照。
//! watch 通道只保留最新值，慢消费者会跳过中间版本，但版本号单调不减。
//! 句柄释放或调用 `unsubscribe` 后停止投递。

use rental_storage::Snapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// 订阅句柄。
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// 停止投递。
    pub fn unsubscribe(self) {
        self.task.abort();
    }

    /// 发布端已关闭且回调不再被调用。
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// 订阅一个集合，每个快照调用一次 `on_snapshot`。
///
/// 需要在 tokio 运行时内调用。
pub fn subscribe<T, F>(
    mut receiver: watch::Receiver<Snapshot<T>>,
    mut on_snapshot: F,
) -> SubscriptionHandle
where
    T: Clone + Send + Sync + 'static,
    F: FnMut(Snapshot<T>) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let current = receiver.borrow_and_update().clone();
        on_snapshot(current);
        while receiver.changed().await.is_ok() {
            let snapshot = receiver.borrow_and_update().clone();
            on_snapshot(snapshot);
        }
        debug!(target: "rental.sync", "change feed closed");
    });
    SubscriptionHandle { task }
}
