//! 输入校验，在任何写入之前完成。

use crate::error::LedgerError;
use domain::billing::MAX_RATE;

/// 必填文本：去除首尾空白后非空。
pub fn required_text(field: &str, value: &str) -> Result<String, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// 费率：非负有限数，不超过 `MAX_RATE`。
pub fn rate(field: &str, value: f64) -> Result<f64, LedgerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    if value > MAX_RATE {
        return Err(LedgerError::validation(format!(
            "{} must not exceed {}",
            field, MAX_RATE
        )));
    }
    Ok(value)
}
