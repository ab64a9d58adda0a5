//! 权限闸门：所有写操作在触及存储前先经过这里。

use crate::error::LedgerError;
use domain::{ActorContext, Operation};
use tracing::warn;

/// 校验操作者是否可执行指定操作，拒绝时返回 PermissionDenied。
pub fn authorize(ctx: &ActorContext, operation: Operation) -> Result<(), LedgerError> {
    if ctx.can(operation) {
        return Ok(());
    }
    warn!(
        target: "rental.ledger",
        actor_id = %ctx.actor_id,
        role = %ctx.role,
        operation = operation.code(),
        "operation denied"
    );
    Err(LedgerError::forbidden(operation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_may_rent_but_not_manage() {
        let worker = ActorContext::worker("u-2", "bob");
        assert!(authorize(&worker, Operation::OpenRental).is_ok());
        assert!(authorize(&worker, Operation::CloseRental).is_ok());
        for operation in [
            Operation::CreateAsset,
            Operation::UpdateAsset,
            Operation::DeleteAsset,
            Operation::OverrideStatus,
            Operation::CreateActor,
        ] {
            let result = authorize(&worker, operation);
            assert!(matches!(result, Err(LedgerError::PermissionDenied(_))));
        }
    }
}
