//! Postgres 租赁存储实现
//!
//! 开租与结租在同一事务内修改 assets 与 rentals：
//! - 设备状态以带谓词的 update 抢占，未命中即回滚
//! - 未结租唯一性由部分唯一索引 `idx_rentals_open_asset` 兜底
//! - 营收使用 `total_revenue = total_revenue + $n` 原子累加

use crate::error::StorageError;
use crate::models::{RentalClose, RentalRecord};
use crate::traits::RentalStore;
use crate::validation::{ensure_amount, ensure_id};
use domain::AssetStatus;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgRentalStore {
    pub pool: PgPool,
}

impl PgRentalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) const RENTAL_COLUMNS: &str = "rental_id, asset_id, asset_name, customer_phone, \
     guarantee_document, (extract(epoch from start_time) * 1000)::bigint as start_time_ms, \
     (extract(epoch from end_time) * 1000)::bigint as end_time_ms, total_cost, \
     actor_id, actor_username";

pub(crate) fn rental_from_row(row: &PgRow) -> Result<RentalRecord, StorageError> {
    Ok(RentalRecord {
        rental_id: row.try_get("rental_id")?,
        asset_id: row.try_get("asset_id")?,
        asset_name: row.try_get("asset_name")?,
        customer_phone: row.try_get("customer_phone")?,
        guarantee_document: row.try_get("guarantee_document")?,
        start_time_ms: row.try_get("start_time_ms")?,
        end_time_ms: row.try_get("end_time_ms")?,
        total_cost: row.try_get("total_cost")?,
        actor_id: row.try_get("actor_id")?,
        actor_username: row.try_get("actor_username")?,
    })
}

#[async_trait::async_trait]
impl RentalStore for PgRentalStore {
    async fn list_rentals(&self) -> Result<Vec<RentalRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {} from rentals order by start_time desc",
            RENTAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(rental_from_row).collect()
    }

    async fn find_open_rental(
        &self,
        asset_id: &str,
    ) -> Result<Option<RentalRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {} from rentals where asset_id = $1 and end_time is null",
            RENTAL_COLUMNS
        ))
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(rental_from_row).transpose()
    }

    async fn open_rental(&self, record: RentalRecord) -> Result<bool, StorageError> {
        ensure_id("rental", &record.rental_id)?;
        ensure_id("asset", &record.asset_id)?;
        if !record.is_open() {
            return Err(StorageError::new("new rental must be open"));
        }
        let mut tx = self.pool.begin().await?;
        let claimed = sqlx::query(
            "update assets set status = 'rented' \
             where asset_id = $1 and status = 'available' and retired_at is null",
        )
        .bind(&record.asset_id)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }
        let inserted = sqlx::query(
            "insert into rentals \
             (rental_id, asset_id, asset_name, customer_phone, guarantee_document, \
              start_time, actor_id, actor_username) \
             values ($1, $2, $3, $4, $5, to_timestamp($6 / 1000.0), $7, $8) \
             on conflict do nothing",
        )
        .bind(&record.rental_id)
        .bind(&record.asset_id)
        .bind(&record.asset_name)
        .bind(&record.customer_phone)
        .bind(&record.guarantee_document)
        .bind(record.start_time_ms as f64)
        .bind(&record.actor_id)
        .bind(&record.actor_username)
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn close_rental(
        &self,
        close: &RentalClose,
    ) -> Result<Option<RentalRecord>, StorageError> {
        ensure_amount("total_cost", close.total_cost)?;
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "update rentals set end_time = to_timestamp($1 / 1000.0), total_cost = $2 \
             where rental_id = $3 and asset_id = $4 and end_time is null \
             returning {}",
            RENTAL_COLUMNS
        ))
        .bind(close.end_time_ms as f64)
        .bind(close.total_cost)
        .bind(&close.rental_id)
        .bind(&close.asset_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let released = sqlx::query(
            "update assets set status = 'available', total_revenue = total_revenue + $1 \
             where asset_id = $2 and status = 'rented' and hourly_rate = $3 and daily_rate = $4",
        )
        .bind(close.total_cost)
        .bind(&close.asset_id)
        .bind(close.hourly_rate)
        .bind(close.daily_rate)
        .execute(&mut *tx)
        .await?;
        if released.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(None);
        }
        let closed = rental_from_row(&row)?;
        tx.commit().await?;
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
        let result = sqlx::query(
            "update assets set status = $1 \
             where asset_id = $2 and status = 'rented' and retired_at is null \
             and not exists (select 1 from rentals where asset_id = $2 and end_time is null)",
        )
        .bind(to.as_str())
        .bind(asset_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
