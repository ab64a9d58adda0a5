//! Postgres 操作者存储实现

use crate::error::StorageError;
use crate::models::ActorRecord;
use crate::traits::ActorStore;
use crate::validation::ensure_id;
use domain::Role;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgActorStore {
    pub pool: PgPool,
}

impl PgActorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACTOR_COLUMNS: &str = "actor_id, username, password_hash, role, \
     (extract(epoch from created_at) * 1000)::bigint as created_at_ms";

fn actor_from_row(row: &PgRow) -> Result<ActorRecord, StorageError> {
    let role: String = row.try_get("role")?;
    Ok(ActorRecord {
        actor_id: row.try_get("actor_id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse::<Role>().map_err(StorageError::corrupt)?,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

#[async_trait::async_trait]
impl ActorStore for PgActorStore {
    async fn list_actors(&self) -> Result<Vec<ActorRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {} from actors order by created_at",
            ACTOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(actor_from_row).collect()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ActorRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {} from actors where username = $1",
            ACTOR_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(actor_from_row).transpose()
    }

    async fn create_actor(
        &self,
        record: ActorRecord,
    ) -> Result<Option<ActorRecord>, StorageError> {
        ensure_id("actor", &record.actor_id)?;
        let result = sqlx::query(
            "insert into actors (actor_id, username, password_hash, role, created_at) \
             values ($1, $2, $3, $4, to_timestamp($5 / 1000.0)) \
             on conflict (username) do nothing",
        )
        .bind(&record.actor_id)
        .bind(&record.username)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(record.created_at_ms as f64)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn update_password_hash(
        &self,
        actor_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update actors set password_hash = $1 where actor_id = $2")
            .bind(password_hash)
            .bind(actor_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
