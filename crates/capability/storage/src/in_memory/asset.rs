//! 设备内存存储实现
//!
//! 功能：
//! - 设备 CRUD（删除为逻辑删除）
//! - 状态条件迁移
//! - 每次写入后在持锁期间发布快照，保证快照顺序与提交顺序一致

use crate::changefeed::{ChangeFeed, Collection};
use crate::error::StorageError;
use crate::models::{AssetRecord, AssetUpdate};
use crate::traits::AssetStore;
use crate::validation::{ensure_id, ensure_rate};
use domain::AssetStatus;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 设备内存存储
///
/// 租赁存储会持有同一实例并直接加锁，锁顺序固定为先设备后租赁。
pub struct InMemoryAssetStore {
    pub(crate) assets: RwLock<HashMap<String, AssetRecord>>,
    feed: Arc<ChangeFeed>,
}

impl InMemoryAssetStore {
    /// 创建新的设备存储
    pub fn new(feed: Arc<ChangeFeed>) -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
            feed,
        }
    }

    pub(crate) fn publish(&self, map: &HashMap<String, AssetRecord>) {
        self.feed.publish_assets(
            map.values()
                .filter(|item| !item.is_retired())
                .cloned()
                .collect(),
        );
    }
}

#[async_trait::async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn list_assets(&self) -> Result<Vec<AssetRecord>, StorageError> {
        let assets = self
            .assets
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        Ok(assets
            .values()
            .filter(|item| !item.is_retired())
            .cloned()
            .collect())
    }

    async fn find_asset(&self, asset_id: &str) -> Result<Option<AssetRecord>, StorageError> {
        let assets = self
            .assets
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        Ok(assets
            .get(asset_id)
            .filter(|item| !item.is_retired())
            .cloned())
    }

    async fn create_asset(&self, record: AssetRecord) -> Result<AssetRecord, StorageError> {
        ensure_id("asset", &record.asset_id)?;
        ensure_rate("hourly_rate", record.hourly_rate)?;
        ensure_rate("daily_rate", record.daily_rate)?;
        let mut assets = self
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        if assets.contains_key(&record.asset_id) {
            return Err(StorageError::duplicate("asset"));
        }
        assets.insert(record.asset_id.clone(), record.clone());
        self.publish(&assets);
        Ok(record)
    }

    async fn update_asset(
        &self,
        asset_id: &str,
        update: AssetUpdate,
    ) -> Result<Option<AssetRecord>, StorageError> {
        if let Some(rate) = update.hourly_rate {
            ensure_rate("hourly_rate", rate)?;
        }
        if let Some(rate) = update.daily_rate {
            ensure_rate("daily_rate", rate)?;
        }
        let mut assets = self
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        let asset = match assets.get_mut(asset_id) {
            Some(asset) if !asset.is_retired() => asset,
            _ => return Ok(None),
        };
        if let Some(name) = update.name {
            asset.name = name;
        }
        if let Some(rate) = update.hourly_rate {
            asset.hourly_rate = rate;
        }
        if let Some(rate) = update.daily_rate {
            asset.daily_rate = rate;
        }
        let updated = asset.clone();
        self.publish(&assets);
        Ok(Some(updated))
    }

    async fn transition_status(
        &self,
        asset_id: &str,
        from: AssetStatus,
        to: AssetStatus,
    ) -> Result<bool, StorageError> {
        let mut assets = self
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        match assets.get_mut(asset_id) {
            Some(asset) if !asset.is_retired() && asset.status == from => {
                asset.status = to;
            }
            _ => return Ok(false),
        }
        self.publish(&assets);
        Ok(true)
    }

    async fn retire_asset(
        &self,
        asset_id: &str,
        retired_at_ms: i64,
    ) -> Result<bool, StorageError> {
        let mut assets = self
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        match assets.get_mut(asset_id) {
            Some(asset) if !asset.is_retired() && asset.status != AssetStatus::Rented => {
                asset.retired_at_ms = Some(retired_at_ms);
            }
            _ => return Ok(false),
        }
        self.publish(&assets);
        Ok(true)
    }
}
