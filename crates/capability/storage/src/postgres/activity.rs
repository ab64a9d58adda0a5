//! Postgres 活动日志存储实现（仅追加）

use crate::error::StorageError;
use crate::models::{ActivityEventRecord, NewActivityEvent};
use crate::traits::ActivityStore;
use crate::validation::ensure_id;
use domain::ActivityKind;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgActivityStore {
    pub pool: PgPool,
}

impl PgActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_COLUMNS: &str = "event_id, (extract(epoch from ts) * 1000)::bigint as ts_ms, \
     actor_id, actor_username, kind, detail";

fn event_from_row(row: &PgRow) -> Result<ActivityEventRecord, StorageError> {
    let kind: String = row.try_get("kind")?;
    Ok(ActivityEventRecord {
        event_id: row.try_get("event_id")?,
        ts_ms: row.try_get("ts_ms")?,
        actor_id: row.try_get("actor_id")?,
        actor_username: row.try_get("actor_username")?,
        kind: kind.parse::<ActivityKind>().map_err(StorageError::corrupt)?,
        detail: row.try_get("detail")?,
    })
}

#[async_trait::async_trait]
impl ActivityStore for PgActivityStore {
    async fn append_event(
        &self,
        event: NewActivityEvent,
    ) -> Result<ActivityEventRecord, StorageError> {
        ensure_id("event", &event.event_id)?;
        let row = sqlx::query(&format!(
            "insert into activity_events (event_id, actor_id, actor_username, kind, detail) \
             values ($1, $2, $3, $4, $5) \
             returning {}",
            EVENT_COLUMNS
        ))
        .bind(&event.event_id)
        .bind(&event.actor_id)
        .bind(&event.actor_username)
        .bind(event.kind.as_str())
        .bind(&event.detail)
        .fetch_one(&self.pool)
        .await?;
        event_from_row(&row)
    }

    async fn list_events(&self) -> Result<Vec<ActivityEventRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {} from activity_events order by ts desc, seq desc",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(event_from_row).collect()
    }
}
