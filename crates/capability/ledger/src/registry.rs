//! 设备登记
//!
//! 设备 CRUD 与手动状态修改，均为管理员操作。
//!
//! 状态机约束：
//! - 不允许手动置为 Rented（只能由开租产生）
//! - 离开 Rented 必须确认没有未结租记录，由存储端条件写入保证
//! - Available 与 Maintenance 之间以"当前状态"为谓词条件迁移

use crate::activity::{self, ActivityLog};
use crate::error::LedgerError;
use crate::policy::authorize;
use crate::validation::{rate, required_text};
use domain::{ActivityKind, ActorContext, AssetStatus, Operation};
use rental_storage::{AssetRecord, AssetStore, AssetUpdate, RentalStore, ServerClock, Stores};
use std::sync::Arc;
use tracing::info;

/// 新设备输入。
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub hourly_rate: f64,
    pub daily_rate: f64,
}

#[derive(Clone)]
pub struct AssetRegistry {
    assets: Arc<dyn AssetStore>,
    rentals: Arc<dyn RentalStore>,
    clock: Arc<dyn ServerClock>,
    activity: ActivityLog,
}

impl AssetRegistry {
    pub fn new(stores: &Stores, activity: ActivityLog) -> Self {
        Self {
            assets: stores.assets.clone(),
            rentals: stores.rentals.clone(),
            clock: stores.clock.clone(),
            activity,
        }
    }

    /// 新建设备：状态 Available，营收 0，入役时间取存储端时间。
    pub async fn create(
        &self,
        ctx: &ActorContext,
        input: NewAsset,
    ) -> Result<AssetRecord, LedgerError> {
        authorize(ctx, Operation::CreateAsset)?;
        let name = required_text("name", &input.name)?;
        let hourly_rate = rate("hourly_rate", input.hourly_rate)?;
        let daily_rate = rate("daily_rate", input.daily_rate)?;
        let now_ms = self.clock.server_time_ms().await?;
        let record = AssetRecord {
            asset_id: uuid::Uuid::new_v4().to_string(),
            name,
            hourly_rate,
            daily_rate,
            status: AssetStatus::Available,
            service_entry_date_ms: now_ms,
            total_revenue: 0.0,
            retired_at_ms: None,
        };
        let created = self.assets.create_asset(record).await?;
        info!(target: "rental.ledger", asset_id = %created.asset_id, actor_id = %ctx.actor_id, "asset created");
        self.activity
            .record(ctx, ActivityKind::AssetAdded, activity::asset_added(&created.name))
            .await;
        Ok(created)
    }

    /// 修改名称或费率；状态与营收不经此修改。
    pub async fn update(
        &self,
        ctx: &ActorContext,
        asset_id: &str,
        update: AssetUpdate,
    ) -> Result<AssetRecord, LedgerError> {
        authorize(ctx, Operation::UpdateAsset)?;
        let asset_id = required_text("asset_id", asset_id)?;
        if update.is_empty() {
            return Err(LedgerError::validation("no fields to update"));
        }
        let update = AssetUpdate {
            name: update
                .name
                .map(|name| required_text("name", &name))
                .transpose()?,
            hourly_rate: update
                .hourly_rate
                .map(|value| rate("hourly_rate", value))
                .transpose()?,
            daily_rate: update
                .daily_rate
                .map(|value| rate("daily_rate", value))
                .transpose()?,
        };
        let updated = self
            .assets
            .update_asset(&asset_id, update)
            .await?
            .ok_or_else(|| LedgerError::not_found("asset", &asset_id))?;
        info!(target: "rental.ledger", asset_id = %asset_id, actor_id = %ctx.actor_id, "asset updated");
        self.activity
            .record(ctx, ActivityKind::AssetUpdated, activity::asset_updated(&updated.name))
            .await;
        Ok(updated)
    }

    /// 逻辑删除；出租中的设备不可删除。
    pub async fn delete(&self, ctx: &ActorContext, asset_id: &str) -> Result<(), LedgerError> {
        authorize(ctx, Operation::DeleteAsset)?;
        let asset_id = required_text("asset_id", asset_id)?;
        let asset = self.require_asset(&asset_id).await?;
        if asset.status == AssetStatus::Rented {
            return Err(LedgerError::conflict(format!(
                "asset {} is rented; return it before deleting",
                asset_id
            )));
        }
        let now_ms = self.clock.server_time_ms().await?;
        if !self.assets.retire_asset(&asset_id, now_ms).await? {
            // 读取与写入之间状态已变化
            return match self.assets.find_asset(&asset_id).await? {
                Some(_) => Err(LedgerError::conflict(format!("asset {} changed concurrently", asset_id))),
                None => Err(LedgerError::not_found("asset", &asset_id)),
            };
        }
        info!(target: "rental.ledger", asset_id = %asset_id, actor_id = %ctx.actor_id, "asset deleted");
        self.activity
            .record(ctx, ActivityKind::AssetDeleted, activity::asset_deleted(&asset.name))
            .await;
        Ok(())
    }

    /// 手动修改状态。
    ///
    /// 目标与当前状态相同时直接返回，不写入也不记录事件。
    pub async fn set_status(
        &self,
        ctx: &ActorContext,
        asset_id: &str,
        status: AssetStatus,
    ) -> Result<AssetRecord, LedgerError> {
        authorize(ctx, Operation::OverrideStatus)?;
        let asset_id = required_text("asset_id", asset_id)?;
        if status == AssetStatus::Rented {
            return Err(LedgerError::validation(
                "status rented can only be set by opening a rental",
            ));
        }
        let asset = self.require_asset(&asset_id).await?;
        if asset.status == status {
            return Ok(asset);
        }
        let applied = if asset.status == AssetStatus::Rented {
            self.rentals.release_rented(&asset_id, status).await?
        } else {
            self.assets
                .transition_status(&asset_id, asset.status, status)
                .await?
        };
        if !applied {
            let message = if asset.status == AssetStatus::Rented {
                format!("asset {} has an open rental; return it first", asset_id)
            } else {
                format!("asset {} changed concurrently", asset_id)
            };
            return Err(LedgerError::conflict(message));
        }
        info!(
            target: "rental.ledger",
            asset_id = %asset_id,
            from = %asset.status,
            to = %status,
            actor_id = %ctx.actor_id,
            "asset status changed"
        );
        self.activity
            .record(
                ctx,
                ActivityKind::StatusChanged,
                activity::status_changed(&asset.name, status),
            )
            .await;
        Ok(AssetRecord { status, ..asset })
    }

    async fn require_asset(&self, asset_id: &str) -> Result<AssetRecord, LedgerError> {
        self.assets
            .find_asset(asset_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("asset", asset_id))
    }
}
