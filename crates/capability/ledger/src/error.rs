//! 租赁核心错误类型
//!
//! 五类结果对调用方可区分，均不会被吞掉：
//! - Validation：输入不合法，未发生任何写入
//! - PermissionDenied：角色无权执行该操作
//! - Conflict：条件写入的前提已不成立，调用方可重新读取后重试
//! - NotFound：引用的设备或租赁记录不存在
//! - StoreUnavailable：存储端故障
//!
//! 构造函数同时累加对应计数器，`?` 转换的存储错误也一样。

use domain::Operation;
use rental_storage::StorageError;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        rental_telemetry::record_validation_failure();
        Self::Validation(message.into())
    }

    pub fn forbidden(operation: Operation) -> Self {
        rental_telemetry::record_permission_denied();
        Self::PermissionDenied(operation.code().to_string())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        rental_telemetry::record_conflict();
        Self::Conflict(message.into())
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        rental_telemetry::record_not_found();
        Self::NotFound(format!("{} {}", kind, id))
    }

    /// 稳定的机器可读错误码。
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "INVALID.REQUEST",
            LedgerError::PermissionDenied(_) => "AUTH.FORBIDDEN",
            LedgerError::Conflict(_) => "RESOURCE.CONFLICT",
            LedgerError::NotFound(_) => "RESOURCE.NOT_FOUND",
            LedgerError::StoreUnavailable(_) => "STORE.UNAVAILABLE",
        }
    }

    /// 对应的 HTTP 状态码。
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::Validation(_) => 400,
            LedgerError::PermissionDenied(_) => 403,
            LedgerError::Conflict(_) => 409,
            LedgerError::NotFound(_) => 404,
            LedgerError::StoreUnavailable(_) => 503,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::Conflict(_))
    }
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        rental_telemetry::record_store_failure();
        warn!(target: "rental.ledger", error = %err, "store unavailable");
        Self::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_are_distinct() {
        let errors = [
            LedgerError::validation("bad"),
            LedgerError::forbidden(Operation::CreateAsset),
            LedgerError::conflict("busy"),
            LedgerError::not_found("asset", "a-1"),
            LedgerError::from(StorageError::new("down")),
        ];
        let codes: Vec<&str> = errors.iter().map(LedgerError::code).collect();
        assert_eq!(
            codes,
            vec![
                "INVALID.REQUEST",
                "AUTH.FORBIDDEN",
                "RESOURCE.CONFLICT",
                "RESOURCE.NOT_FOUND",
                "STORE.UNAVAILABLE"
            ]
        );
        let statuses: Vec<u16> = errors.iter().map(LedgerError::http_status).collect();
        assert_eq!(statuses, vec![400, 403, 409, 404, 503]);
    }

    #[test]
    fn forbidden_carries_operation_code() {
        let err = LedgerError::forbidden(Operation::OverrideStatus);
        assert_eq!(err.to_string(), "permission denied: ASSET.STATUS.OVERRIDE");
    }
}
