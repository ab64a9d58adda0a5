//! Postgres 存储端时钟

use crate::error::StorageError;
use crate::traits::ServerClock;
use sqlx::PgPool;

pub struct PgServerClock {
    pub pool: PgPool,
}

impl PgServerClock {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ServerClock for PgServerClock {
    async fn server_time_ms(&self) -> Result<i64, StorageError> {
        let now_ms: i64 =
            sqlx::query_scalar("select (extract(epoch from clock_timestamp()) * 1000)::bigint")
                .fetch_one(&self.pool)
                .await?;
        Ok(now_ms)
    }
}
