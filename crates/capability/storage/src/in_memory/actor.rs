//! 操作者内存存储实现
//!
//! 功能：
//! - 用户名唯一
//! - 每次写入后发布操作者档案快照

use crate::changefeed::{ChangeFeed, Collection};
use crate::error::StorageError;
use crate::models::ActorRecord;
use crate::traits::ActorStore;
use crate::validation::ensure_id;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 操作者内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储，键为 actor_id。
pub struct InMemoryActorStore {
    actors: RwLock<HashMap<String, ActorRecord>>,
    feed: Arc<ChangeFeed>,
}

impl InMemoryActorStore {
    /// 创建新的操作者存储
    pub fn new(feed: Arc<ChangeFeed>) -> Self {
        Self {
            actors: RwLock::new(HashMap::new()),
            feed,
        }
    }

    fn publish(&self, map: &HashMap<String, ActorRecord>) {
        self.feed
            .publish_actors(map.values().map(ActorRecord::profile).collect());
    }
}

#[async_trait::async_trait]
impl ActorStore for InMemoryActorStore {
    async fn list_actors(&self) -> Result<Vec<ActorRecord>, StorageError> {
        let actors = self
            .actors
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Actors))?;
        Ok(actors.values().cloned().collect())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ActorRecord>, StorageError> {
        let actors = self
            .actors
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Actors))?;
        Ok(actors
            .values()
            .find(|item| item.username == username)
            .cloned())
    }

    async fn create_actor(
        &self,
        record: ActorRecord,
    ) -> Result<Option<ActorRecord>, StorageError> {
        ensure_id("actor", &record.actor_id)?;
        let mut actors = self
            .actors
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Actors))?;
        if actors.contains_key(&record.actor_id) {
            return Err(StorageError::duplicate("actor"));
        }
        if actors.values().any(|item| item.username == record.username) {
            return Ok(None);
        }
        actors.insert(record.actor_id.clone(), record.clone());
        self.publish(&actors);
        Ok(Some(record))
    }

    async fn update_password_hash(
        &self,
        actor_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut actors = self
            .actors
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Actors))?;
        match actors.get_mut(actor_id) {
            Some(actor) => {
                actor.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
