//! 请求参数解析
//!
//! 字符串形式的状态、角色在这里转换为领域类型。解析失败按校验错误处理，
//! 与 ledger 返回的校验错误使用同一错误码。

use crate::utils::response::ledger_error;
use axum::response::Response;
use domain::{AssetStatus, Role};
use rental_ledger::LedgerError;

pub fn parse_status(value: &str) -> Result<AssetStatus, Response> {
    value
        .parse::<AssetStatus>()
        .map_err(|err| ledger_error(LedgerError::validation(err)))
}

/// 可选状态过滤；空字符串视为未提供。
pub fn parse_optional_status(value: Option<&str>) -> Result<Option<AssetStatus>, Response> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => parse_status(value).map(Some),
        _ => Ok(None),
    }
}

pub fn parse_optional_role(value: Option<&str>) -> Result<Option<Role>, Response> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value
            .parse::<Role>()
            .map(Some)
            .map_err(|err| ledger_error(LedgerError::validation(err))),
        _ => Ok(None),
    }
}
