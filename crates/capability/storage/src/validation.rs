//! 验证辅助函数
//!
//! 存储端写入前的最后一道校验，保证落库数据满足约束：
//! - ensure_id：记录 ID 非空
//! - ensure_amount：金额为非负有限数
//! - ensure_rate：费率为非负有限数且不超过上限
//!
//! 面向调用方的输入校验在 ledger 层完成，这里只兜底。

use crate::error::StorageError;
use domain::billing::MAX_RATE;

/// 验证记录 ID 非空
pub fn ensure_id(kind: &str, id: &str) -> Result<(), StorageError> {
    if id.trim().is_empty() {
        return Err(StorageError::new(format!("{} id required", kind)));
    }
    Ok(())
}

/// 验证金额为非负有限数
pub fn ensure_amount(field: &str, value: f64) -> Result<(), StorageError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StorageError::new(format!("{} must be a non-negative number", field)));
    }
    Ok(())
}

/// 验证费率不超过 `MAX_RATE`
pub fn ensure_rate(field: &str, value: f64) -> Result<(), StorageError> {
    ensure_amount(field, value)?;
    if value > MAX_RATE {
        return Err(StorageError::new(format!("{} exceeds {}", field, MAX_RATE)));
    }
    Ok(())
}
