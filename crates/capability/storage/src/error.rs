//! 存储层错误类型
//!
//! `StorageError` 只表示"存储不可用"一类的故障：SQL/连接错误、锁中毒、
//! 库中数据无法解码、写入违反约束。ledger 把它统一映射为 StoreUnavailable。
//!
//! 条件写入的谓词不成立不是错误，由各接口的 `bool` / `Option` 返回值表达。

use crate::changefeed::Collection;
use std::fmt;

#[derive(Debug)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// 内存后端的集合锁已中毒。
    pub fn poisoned(collection: Collection) -> Self {
        Self::new(format!("{} lock poisoned", collection))
    }

    /// 主键重复（调用方生成的 id 冲突）。
    pub fn duplicate(kind: &str) -> Self {
        Self::new(format!("{} already exists", kind))
    }

    /// 库中数据无法还原为领域值。
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::new(format!("corrupt row: {}", detail.into()))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::corrupt(format!("column {}: {}", index, source))
            }
            other => Self::new(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_source() {
        assert_eq!(
            StorageError::poisoned(Collection::Rentals).to_string(),
            "rentals lock poisoned"
        );
        assert_eq!(StorageError::duplicate("asset").to_string(), "asset already exists");
        assert_eq!(
            StorageError::corrupt("unknown role: owner").to_string(),
            "corrupt row: unknown role: owner"
        );
    }
}
