//! 写后回显等待
//!
//! 写操作提交后，等本服务的同步视图满足两个条件再返回：
//! - 调用方给出的谓词成立（视图里已能看到这次写入）
//! - 各集合已追上提交时刻变更推送的版本（活动日志等附带写入也已到达）
//!
//! 超时只记录，不影响已提交的结果。

use crate::AppState;
use rental_storage::Collection;
use rental_sync::LocalView;
use tracing::warn;

pub async fn await_echo(
    state: &AppState,
    operation: &'static str,
    predicate: impl Fn(&LocalView) -> bool,
) {
    let committed = Collection::ALL.map(|collection| (collection, state.feed.version(collection)));
    let caught_up = |view: &LocalView| {
        committed
            .iter()
            .all(|(collection, version)| view.versions.get(*collection) >= *version)
            && predicate(view)
    };
    if !state.sync.wait_until(state.echo_timeout, caught_up).await {
        rental_telemetry::record_sync_echo_timeout();
        warn!(
            target: "rental.api",
            operation,
            timeout_ms = state.echo_timeout.as_millis() as u64,
            "write committed but echo not observed in time"
        );
    }
}
