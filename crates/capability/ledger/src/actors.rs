//! 操作者目录：新建操作者与首个管理员初始化。

use crate::activity::{self, ActivityLog};
use crate::error::LedgerError;
use crate::policy::authorize;
use crate::validation::required_text;
use domain::{ActivityKind, ActorContext, Operation, Role};
use rental_storage::{ActorProfile, ActorRecord, ActorStore, ServerClock, Stores};
use std::sync::Arc;
use tracing::info;

/// 新操作者输入。未指定角色时为 Worker。
#[derive(Debug, Clone)]
pub struct NewActor {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Clone)]
pub struct ActorDirectory {
    actors: Arc<dyn ActorStore>,
    clock: Arc<dyn ServerClock>,
    activity: ActivityLog,
}

impl ActorDirectory {
    pub fn new(stores: &Stores, activity: ActivityLog) -> Self {
        Self {
            actors: stores.actors.clone(),
            clock: stores.clock.clone(),
            activity,
        }
    }

    pub async fn list(&self) -> Result<Vec<ActorProfile>, LedgerError> {
        let actors = self.actors.list_actors().await?;
        Ok(actors.iter().map(ActorRecord::profile).collect())
    }

    /// 新建操作者（仅管理员）。用户名重复返回 Conflict。
    pub async fn create(
        &self,
        ctx: &ActorContext,
        input: NewActor,
    ) -> Result<ActorProfile, LedgerError> {
        authorize(ctx, Operation::CreateActor)?;
        let created = self
            .insert(input.username, input.password, input.role.unwrap_or(Role::Worker))
            .await?;
        info!(target: "rental.ledger", actor_id = %created.actor_id, role = %created.role, "actor created");
        self.activity
            .record(ctx, ActivityKind::ActorAdded, activity::actor_added(&created.username))
            .await;
        Ok(created)
    }

    /// 操作者集合为空时创建首个管理员；已有操作者时返回 `None`。
    pub async fn bootstrap_manager(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<ActorProfile>, LedgerError> {
        if !self.actors.list_actors().await?.is_empty() {
            return Ok(None);
        }
        let created = self
            .insert(username.to_string(), password.to_string(), Role::Manager)
            .await?;
        info!(target: "rental.ledger", actor_id = %created.actor_id, "bootstrap manager created");
        let ctx = ActorContext::new(
            created.actor_id.clone(),
            created.username.clone(),
            created.role,
        );
        self.activity
            .record(&ctx, ActivityKind::ActorAdded, activity::actor_added(&created.username))
            .await;
        Ok(Some(created))
    }

    async fn insert(
        &self,
        username: String,
        password: String,
        role: Role,
    ) -> Result<ActorProfile, LedgerError> {
        let username = required_text("username", &username)?;
        if password.is_empty() {
            return Err(LedgerError::validation("password is required"));
        }
        let password_hash = rental_auth::hash_password(&password)
            .map_err(|err| LedgerError::validation(err.to_string()))?;
        let created_at_ms = self.clock.server_time_ms().await?;
        let record = ActorRecord {
            actor_id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash,
            role,
            created_at_ms,
        };
        let username = record.username.clone();
        self.actors
            .create_actor(record)
            .await?
            .map(|created| created.profile())
            .ok_or_else(|| LedgerError::conflict(format!("username {} is taken", username)))
    }
}
