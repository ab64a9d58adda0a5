//! 访问策略：角色 × 操作 → 允许/拒绝。
//!
//! 权限表集中定义为静态数据，调用方只通过 [`allowed`] 查询，
//! 不在业务代码中散落角色判断。

use crate::data::Role;

/// 受控操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAsset,
    UpdateAsset,
    DeleteAsset,
    /// 手动覆盖设备状态（不含开租/归还的联动变更）。
    OverrideStatus,
    OpenRental,
    CloseRental,
    CreateActor,
}

impl Operation {
    /// 稳定的权限码（日志与错误信息使用）。
    pub fn code(&self) -> &'static str {
        match self {
            Operation::CreateAsset => "ASSET.CREATE",
            Operation::UpdateAsset => "ASSET.UPDATE",
            Operation::DeleteAsset => "ASSET.DELETE",
            Operation::OverrideStatus => "ASSET.STATUS.OVERRIDE",
            Operation::OpenRental => "RENTAL.OPEN",
            Operation::CloseRental => "RENTAL.CLOSE",
            Operation::CreateActor => "ACTOR.CREATE",
        }
    }
}

/// 权限表：(操作, Manager, Worker)。
pub const POLICY_TABLE: &[(Operation, bool, bool)] = &[
    (Operation::CreateAsset, true, false),
    (Operation::UpdateAsset, true, false),
    (Operation::DeleteAsset, true, false),
    (Operation::OverrideStatus, true, false),
    (Operation::OpenRental, true, true),
    (Operation::CloseRental, true, true),
    (Operation::CreateActor, true, false),
];

/// 查询角色是否允许执行操作；未登记的操作一律拒绝。
pub fn allowed(role: Role, operation: Operation) -> bool {
    POLICY_TABLE
        .iter()
        .find(|(op, _, _)| *op == operation)
        .map(|(_, manager, worker)| match role {
            Role::Manager => *manager,
            Role::Worker => *worker,
        })
        .unwrap_or(false)
}
