pub mod billing;
pub mod data;
pub mod permissions;

pub use billing::{BillingBreakdown, rental_cost};
pub use data::{ActivityKind, AssetStatus, Role};
pub use permissions::{Operation, allowed};

/// 操作者上下文：所有模块共享的执行身份。
///
/// `username` 为冗余快照，写入租赁记录与活动日志时直接使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    pub actor_id: String,
    pub username: String,
    pub role: Role,
}

impl ActorContext {
    /// 构造显式身份与角色的操作者上下文。
    pub fn new(actor_id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            actor_id: actor_id.into(),
            username: username.into(),
            role,
        }
    }

    /// 便捷构造：管理员。
    pub fn manager(actor_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self::new(actor_id, username, Role::Manager)
    }

    /// 便捷构造：工人。
    pub fn worker(actor_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self::new(actor_id, username, Role::Worker)
    }

    /// 当前上下文是否允许执行指定操作。
    pub fn can(&self, operation: Operation) -> bool {
        allowed(self.role, operation)
    }
}
