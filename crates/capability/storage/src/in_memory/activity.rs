//! 活动日志内存存储实现（仅追加）

use crate::changefeed::{ChangeFeed, Collection};
use crate::clock::Clock;
use crate::error::StorageError;
use crate::models::{ActivityEventRecord, NewActivityEvent};
use crate::traits::ActivityStore;
use crate::validation::ensure_id;
use std::sync::{Arc, RwLock};

/// 活动日志内存存储
///
/// 按追加顺序保存；同一毫秒内的事件以追加顺序区分先后。
pub struct InMemoryActivityStore {
    events: RwLock<Vec<ActivityEventRecord>>,
    clock: Arc<dyn Clock>,
    feed: Arc<ChangeFeed>,
}

impl InMemoryActivityStore {
    /// 创建新的活动日志存储
    pub fn new(clock: Arc<dyn Clock>, feed: Arc<ChangeFeed>) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            clock,
            feed,
        }
    }
}

fn newest_first(events: &[ActivityEventRecord]) -> Vec<ActivityEventRecord> {
    events.iter().rev().cloned().collect()
}

#[async_trait::async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn append_event(
        &self,
        event: NewActivityEvent,
    ) -> Result<ActivityEventRecord, StorageError> {
        ensure_id("event", &event.event_id)?;
        let mut events = self
            .events
            .write()
            .map_err(|_| StorageError::poisoned(Collection::ActivityEvents))?;
        // 时间戳不回退，保证追加顺序与时间顺序一致
        let last_ts = events.last().map(|item| item.ts_ms).unwrap_or(i64::MIN);
        let record = ActivityEventRecord {
            event_id: event.event_id,
            ts_ms: self.clock.now_ms().max(last_ts),
            actor_id: event.actor_id,
            actor_username: event.actor_username,
            kind: event.kind,
            detail: event.detail,
        };
        events.push(record.clone());
        self.feed.publish_activity(newest_first(&events));
        Ok(record)
    }

    async fn list_events(&self) -> Result<Vec<ActivityEventRecord>, StorageError> {
        let events = self
            .events
            .read()
            .map_err(|_| StorageError::poisoned(Collection::ActivityEvents))?;
        Ok(newest_first(&events))
    }
}
