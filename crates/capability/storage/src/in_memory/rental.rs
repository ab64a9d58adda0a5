//! 租赁内存存储实现
//!
//! 开租/结租需要同时修改设备与租赁，两把锁按"先设备后租赁"的固定顺序获取，
//! 整个检查与写入过程都在锁内完成，快照也在锁内发布。

use crate::changefeed::{ChangeFeed, Collection};
use crate::error::StorageError;
use crate::in_memory::asset::InMemoryAssetStore;
use crate::models::{RentalClose, RentalRecord};
use crate::traits::RentalStore;
use crate::validation::{ensure_amount, ensure_id};
use domain::AssetStatus;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 租赁内存存储
pub struct InMemoryRentalStore {
    assets: Arc<InMemoryAssetStore>,
    rentals: RwLock<HashMap<String, RentalRecord>>,
    feed: Arc<ChangeFeed>,
}

impl InMemoryRentalStore {
    /// 创建新的租赁存储，与设备存储共享同一份设备数据
    pub fn new(assets: Arc<InMemoryAssetStore>, feed: Arc<ChangeFeed>) -> Self {
        Self {
            assets,
            rentals: RwLock::new(HashMap::new()),
            feed,
        }
    }

    fn publish(&self, map: &HashMap<String, RentalRecord>) {
        self.feed.publish_rentals(map.values().cloned().collect());
    }
}

fn has_open_rental(map: &HashMap<String, RentalRecord>, asset_id: &str) -> bool {
    map.values()
        .any(|item| item.asset_id == asset_id && item.is_open())
}

#[async_trait::async_trait]
impl RentalStore for InMemoryRentalStore {
    async fn list_rentals(&self) -> Result<Vec<RentalRecord>, StorageError> {
        let rentals = self
            .rentals
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Rentals))?;
        Ok(rentals.values().cloned().collect())
    }

    async fn find_open_rental(
        &self,
        asset_id: &str,
    ) -> Result<Option<RentalRecord>, StorageError> {
        let rentals = self
            .rentals
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Rentals))?;
        Ok(rentals
            .values()
            .find(|item| item.asset_id == asset_id && item.is_open())
            .cloned())
    }

    async fn open_rental(&self, record: RentalRecord) -> Result<bool, StorageError> {
        ensure_id("rental", &record.rental_id)?;
        ensure_id("asset", &record.asset_id)?;
        if !record.is_open() {
            return Err(StorageError::new("new rental must be open"));
        }
        let mut assets = self
            .assets
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        let mut rentals = self
            .rentals
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Rentals))?;
        if rentals.contains_key(&record.rental_id) {
            return Err(StorageError::duplicate("rental"));
        }
        match assets.get_mut(&record.asset_id) {
            Some(asset)
                if !asset.is_retired()
                    && asset.status == AssetStatus::Available
                    && !has_open_rental(&rentals, &record.asset_id) =>
            {
                asset.status = AssetStatus::Rented;
            }
            _ => return Ok(false),
        }
        rentals.insert(record.rental_id.clone(), record);
        self.assets.publish(&assets);
        self.publish(&rentals);
        Ok(true)
    }

    async fn close_rental(
        &self,
        close: &RentalClose,
    ) -> Result<Option<RentalRecord>, StorageError> {
        ensure_amount("total_cost", close.total_cost)?;
        let mut assets = self
            .assets
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        let mut rentals = self
            .rentals
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Rentals))?;
        let rental = match rentals.get_mut(&close.rental_id) {
            Some(rental) if rental.is_open() && rental.asset_id == close.asset_id => rental,
            _ => return Ok(None),
        };
        let asset = match assets.get_mut(&close.asset_id) {
            Some(asset)
                if asset.status == AssetStatus::Rented
                    && asset.hourly_rate == close.hourly_rate
                    && asset.daily_rate == close.daily_rate =>
            {
                asset
            }
            _ => return Ok(None),
        };
        rental.end_time_ms = Some(close.end_time_ms);
        rental.total_cost = Some(close.total_cost);
        let closed = rental.clone();
        asset.status = AssetStatus::Available;
        asset.total_revenue += close.total_cost;
        self.assets.publish(&assets);
        self.publish(&rentals);
        Ok(Some(closed))
    }

    async fn release_rented(
        &self,
        asset_id: &str,
        to: AssetStatus,
    ) -> Result<bool, StorageError> {
        if to == AssetStatus::Rented {
            return Ok(false);
        }
        let mut assets = self
            .assets
            .assets
            .write()
            .map_err(|_| StorageError::poisoned(Collection::Assets))?;
        let rentals = self
            .rentals
            .read()
            .map_err(|_| StorageError::poisoned(Collection::Rentals))?;
        match assets.get_mut(asset_id) {
            Some(asset)
                if !asset.is_retired()
                    && asset.status == AssetStatus::Rented
                    && !has_open_rental(&rentals, asset_id) =>
            {
                asset.status = to;
            }
            _ => return Ok(false),
        }
        self.assets.publish(&assets);
        Ok(true)
    }
}
