//! PostgreSQL 连接池
//!
//! 开租、结租各占用一个事务连接，池大小即这两类写操作的最大并发。

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// 取连接的等待上限，超时按存储不可用返回
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StorageError> {
    let max_connections = max_connections.max(1);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    info!(target: "rental.storage", max_connections, "postgres pool ready");
    Ok(pool)
}
