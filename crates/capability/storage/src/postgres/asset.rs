//! Postgres 设备存储实现
//!
//! 状态迁移与逻辑删除都以单条带谓词的 update 完成，
//! 以 `rows_affected` 判断谓词是否成立。

use crate::error::StorageError;
use crate::models::{AssetRecord, AssetUpdate};
use crate::traits::AssetStore;
use crate::validation::{ensure_id, ensure_rate};
use domain::AssetStatus;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgAssetStore {
    pub pool: PgPool,
}

impl PgAssetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) const ASSET_COLUMNS: &str = "asset_id, name, hourly_rate, daily_rate, status, \
     (extract(epoch from service_entry_date) * 1000)::bigint as service_entry_date_ms, \
     total_revenue, (extract(epoch from retired_at) * 1000)::bigint as retired_at_ms";

pub(crate) fn asset_from_row(row: &PgRow) -> Result<AssetRecord, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(AssetRecord {
        asset_id: row.try_get("asset_id")?,
        name: row.try_get("name")?,
        hourly_rate: row.try_get("hourly_rate")?,
        daily_rate: row.try_get("daily_rate")?,
        status: status.parse::<AssetStatus>().map_err(StorageError::corrupt)?,
        service_entry_date_ms: row.try_get("service_entry_date_ms")?,
        total_revenue: row.try_get("total_revenue")?,
        retired_at_ms: row.try_get("retired_at_ms")?,
    })
}

#[async_trait::async_trait]
impl AssetStore for PgAssetStore {
    async fn list_assets(&self) -> Result<Vec<AssetRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {} from assets where retired_at is null order by service_entry_date desc",
            ASSET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(asset_from_row).collect()
    }

    async fn find_asset(&self, asset_id: &str) -> Result<Option<AssetRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {} from assets where asset_id = $1 and retired_at is null",
            ASSET_COLUMNS
        ))
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    async fn create_asset(&self, record: AssetRecord) -> Result<AssetRecord, StorageError> {
        ensure_id("asset", &record.asset_id)?;
        ensure_rate("hourly_rate", record.hourly_rate)?;
        ensure_rate("daily_rate", record.daily_rate)?;
        sqlx::query(
            "insert into assets \
             (asset_id, name, hourly_rate, daily_rate, status, service_entry_date, total_revenue) \
             values ($1, $2, $3, $4, $5, to_timestamp($6 / 1000.0), $7)",
        )
        .bind(&record.asset_id)
        .bind(&record.name)
        .bind(record.hourly_rate)
        .bind(record.daily_rate)
        .bind(record.status.as_str())
        .bind(record.service_entry_date_ms as f64)
        .bind(record.total_revenue)
        .execute(&self.pool)
        .await?;
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
        let row = sqlx::query(&format!(
            "update assets set \
             name = coalesce($1, name), \
             hourly_rate = coalesce($2, hourly_rate), \
             daily_rate = coalesce($3, daily_rate) \
             where asset_id = $4 and retired_at is null \
             returning {}",
            ASSET_COLUMNS
        ))
        .bind(update.name)
        .bind(update.hourly_rate)
        .bind(update.daily_rate)
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    async fn transition_status(
        &self,
        asset_id: &str,
        from: AssetStatus,
        to: AssetStatus,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update assets set status = $1 \
             where asset_id = $2 and status = $3 and retired_at is null",
        )
        .bind(to.as_str())
        .bind(asset_id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn retire_asset(
        &self,
        asset_id: &str,
        retired_at_ms: i64,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update assets set retired_at = to_timestamp($1 / 1000.0) \
             where asset_id = $2 and retired_at is null and status <> 'rented'",
        )
        .bind(retired_at_ms as f64)
        .bind(asset_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
