//! 租赁账本：开租与结租。
//!
//! 两个操作都以存储端的单次条件事务完成：
//! - 开租：设备 Available 且无未结租记录，才插入记录并置为 Rented
//! - 结租：记录未结租、设备 Rented 且费率与计费时一致，才写入费用并原子累加营收
//!
//! 本地的预检查只用于给出更准确的错误，正确性完全依赖存储端谓词。
//! 结租冲突后最多重新读取一次再试，仍冲突则交给调用方。

use crate::activity::{self, ActivityLog};
use crate::error::LedgerError;
use crate::policy::authorize;
use crate::validation::required_text;
use domain::billing::{BillingBreakdown, breakdown};
use domain::{ActivityKind, ActorContext, AssetStatus, Operation};
use rental_storage::{
    AssetRecord, AssetStore, RentalClose, RentalRecord, RentalStore, ServerClock, Stores,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 开租输入。
#[derive(Debug, Clone)]
pub struct OpenRental {
    pub customer_phone: String,
    pub guarantee_document: String,
}

/// 结租结果。
#[derive(Debug, Clone)]
pub struct ClosedRental {
    pub rental: RentalRecord,
    pub billing: BillingBreakdown,
}

#[derive(Clone)]
pub struct RentalLedger {
    assets: Arc<dyn AssetStore>,
    rentals: Arc<dyn RentalStore>,
    clock: Arc<dyn ServerClock>,
    activity: ActivityLog,
}

impl RentalLedger {
    pub fn new(stores: &Stores, activity: ActivityLog) -> Self {
        Self {
            assets: stores.assets.clone(),
            rentals: stores.rentals.clone(),
            clock: stores.clock.clone(),
            activity,
        }
    }

    /// 开租。
    pub async fn open_rental(
        &self,
        ctx: &ActorContext,
        asset_id: &str,
        input: OpenRental,
    ) -> Result<RentalRecord, LedgerError> {
        authorize(ctx, Operation::OpenRental)?;
        let asset_id = required_text("asset_id", asset_id)?;
        let customer_phone = required_text("customer_phone", &input.customer_phone)?;
        let guarantee_document = required_text("guarantee_document", &input.guarantee_document)?;
        let started = Instant::now();

        let asset = self.require_asset(&asset_id).await?;
        if asset.status != AssetStatus::Available {
            return Err(LedgerError::conflict(format!(
                "asset {} is {}, not available",
                asset_id, asset.status
            )));
        }
        let start_time_ms = self.clock.server_time_ms().await?;
        let record = RentalRecord {
            rental_id: uuid::Uuid::new_v4().to_string(),
            asset_id: asset_id.clone(),
            asset_name: asset.name.clone(),
            customer_phone,
            guarantee_document,
            start_time_ms,
            end_time_ms: None,
            total_cost: None,
            actor_id: ctx.actor_id.clone(),
            actor_username: ctx.username.clone(),
        };
        if !self.rentals.open_rental(record.clone()).await? {
            warn!(target: "rental.ledger", asset_id = %asset_id, actor_id = %ctx.actor_id, "open rental lost the race");
            return Err(LedgerError::conflict(format!(
                "asset {} is no longer available",
                asset_id
            )));
        }
        rental_telemetry::record_rental_opened();
        rental_telemetry::record_ledger_latency_ms(started.elapsed().as_millis() as u64);
        info!(
            target: "rental.ledger",
            rental_id = %record.rental_id,
            asset_id = %asset_id,
            actor_id = %ctx.actor_id,
            "rental opened"
        );
        self.activity
            .record(
                ctx,
                ActivityKind::RentOpened,
                activity::rent_opened(&record.asset_name, &record.customer_phone),
            )
            .await;
        Ok(record)
    }

    /// 结租并结算。费用按结租时刻的设备费率计算。
    pub async fn close_rental(
        &self,
        ctx: &ActorContext,
        asset_id: &str,
    ) -> Result<ClosedRental, LedgerError> {
        authorize(ctx, Operation::CloseRental)?;
        let asset_id = required_text("asset_id", asset_id)?;
        let started = Instant::now();

        for attempt in 0..2 {
            let asset = self.require_asset(&asset_id).await?;
            let Some(open) = self.rentals.find_open_rental(&asset_id).await? else {
                if attempt == 0 {
                    return Err(LedgerError::not_found("open rental for asset", &asset_id));
                }
                return Err(LedgerError::conflict(format!(
                    "rental for asset {} was closed concurrently",
                    asset_id
                )));
            };
            // 时钟回拨时结束时间不早于开始时间
            let end_time_ms = self.clock.server_time_ms().await?.max(open.start_time_ms);
            let billing = breakdown(
                open.start_time_ms,
                end_time_ms,
                asset.hourly_rate,
                asset.daily_rate,
            );
            if !billing.total_cost.is_finite() {
                return Err(LedgerError::validation(format!(
                    "rental cost for asset {} is out of range, adjust the rates first",
                    asset_id
                )));
            }
            let close = RentalClose {
                rental_id: open.rental_id.clone(),
                asset_id: asset_id.clone(),
                end_time_ms,
                total_cost: billing.total_cost,
                hourly_rate: asset.hourly_rate,
                daily_rate: asset.daily_rate,
            };
            let Some(rental) = self.rentals.close_rental(&close).await? else {
                warn!(
                    target: "rental.ledger",
                    asset_id = %asset_id,
                    rental_id = %open.rental_id,
                    attempt,
                    "close rental conflicted"
                );
                continue;
            };

            rental_telemetry::record_rental_closed(billing.total_cost);
            rental_telemetry::record_ledger_latency_ms(started.elapsed().as_millis() as u64);
            info!(
                target: "rental.ledger",
                rental_id = %rental.rental_id,
                asset_id = %asset_id,
                actor_id = %ctx.actor_id,
                total_cost = billing.total_cost,
                duration_hours = billing.duration_hours,
                "rental closed"
            );
            self.activity
                .record(
                    ctx,
                    ActivityKind::RentClosed,
                    activity::rent_closed(&asset.name, billing.total_cost),
                )
                .await;
            return Ok(ClosedRental { rental, billing });
        }
        Err(LedgerError::conflict(format!(
            "asset {} changed while closing the rental",
            asset_id
        )))
    }

    async fn require_asset(&self, asset_id: &str) -> Result<AssetRecord, LedgerError> {
        self.assets
            .find_asset(asset_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("asset", asset_id))
    }
}
