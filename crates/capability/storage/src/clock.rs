//! 时钟
//!
//! - SystemClock：系统时间
//! - ManualClock：手动推进（测试中复现计费时长）
//! - LocalServerClock：把本地时钟包装为 ServerClock（内存后端使用）

use crate::error::StorageError;
use crate::traits::ServerClock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 毫秒时间源。
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// 系统时钟。
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        now_epoch_ms()
    }
}

/// 手动时钟。
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn advance_hours(&self, hours: i64) {
        self.advance_ms(hours.saturating_mul(3_600_000));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// 以本地时钟充当存储端时钟。
pub struct LocalServerClock {
    clock: Arc<dyn Clock>,
}

impl LocalServerClock {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait::async_trait]
impl ServerClock for LocalServerClock {
    async fn server_time_ms(&self) -> Result<i64, StorageError> {
        Ok(self.clock.now_ms())
    }
}

/// 当前时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis() as i64)
        .unwrap_or_default()
}
