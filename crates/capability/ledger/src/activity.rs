//! 活动日志
//!
//! 每次成功的写操作之后追加一条事件；被拒绝或失败的操作不记录。
//! 主操作已提交后追加失败只记 error 日志，不回滚也不改变主操作结果。

use crate::error::LedgerError;
use domain::{ActivityKind, ActorContext, AssetStatus};
use rental_storage::{ActivityEventRecord, ActivityStore, NewActivityEvent};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn ActivityStore>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// 追加事件，时间戳由存储端分配。
    pub async fn record(
        &self,
        ctx: &ActorContext,
        kind: ActivityKind,
        detail: String,
    ) -> Option<ActivityEventRecord> {
        let event = NewActivityEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            actor_id: ctx.actor_id.clone(),
            actor_username: ctx.username.clone(),
            kind,
            detail,
        };
        match self.store.append_event(event).await {
            Ok(record) => {
                debug!(target: "rental.ledger", event_id = %record.event_id, kind = %kind, "activity recorded");
                Some(record)
            }
            Err(err) => {
                rental_telemetry::record_activity_append_failure();
                error!(
                    target: "rental.ledger",
                    actor_id = %ctx.actor_id,
                    kind = %kind,
                    error = %err,
                    "activity append failed after commit"
                );
                None
            }
        }
    }

    /// 全部事件，时间倒序。
    pub async fn list(&self) -> Result<Vec<ActivityEventRecord>, LedgerError> {
        Ok(self.store.list_events().await?)
    }
}

pub(crate) fn rent_opened(asset_name: &str, customer_phone: &str) -> String {
    format!("rented asset {} to customer {}", asset_name, customer_phone)
}

pub(crate) fn rent_closed(asset_name: &str, total_cost: f64) -> String {
    format!("returned asset {}, cost {:.2}", asset_name, total_cost)
}

pub(crate) fn asset_added(name: &str) -> String {
    format!("added asset {}", name)
}

pub(crate) fn asset_updated(name: &str) -> String {
    format!("updated asset {}", name)
}

pub(crate) fn asset_deleted(name: &str) -> String {
    format!("deleted asset {}", name)
}

pub(crate) fn actor_added(username: &str) -> String {
    format!("added actor {}", username)
}

pub(crate) fn status_changed(asset_name: &str, status: AssetStatus) -> String {
    format!("changed status of asset {} to {}", asset_name, status)
}
