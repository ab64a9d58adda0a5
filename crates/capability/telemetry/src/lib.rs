//! 追踪、请求 ID 生成与租赁操作计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rentals_opened: u64,
    pub rentals_closed: u64,
    pub revenue_cents_total: u64,
    pub conflicts: u64,
    pub permission_denied: u64,
    pub validation_failures: u64,
    pub not_found: u64,
    pub store_failures: u64,
    pub activity_append_failures: u64,
    pub sync_echo_timeouts: u64,
    pub ledger_latency_ms_total: u64,
    pub ledger_latency_ms_count: u64,
}

/// 租赁操作计数器。
pub struct TelemetryMetrics {
    rentals_opened: AtomicU64,
    rentals_closed: AtomicU64,
    revenue_cents_total: AtomicU64,
    conflicts: AtomicU64,
    permission_denied: AtomicU64,
    validation_failures: AtomicU64,
    not_found: AtomicU64,
    store_failures: AtomicU64,
    activity_append_failures: AtomicU64,
    sync_echo_timeouts: AtomicU64,
    ledger_latency_ms_total: AtomicU64,
    ledger_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            rentals_opened: AtomicU64::new(0),
            rentals_closed: AtomicU64::new(0),
            revenue_cents_total: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
            permission_denied: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            store_failures: AtomicU64::new(0),
            activity_append_failures: AtomicU64::new(0),
            sync_echo_timeouts: AtomicU64::new(0),
            ledger_latency_ms_total: AtomicU64::new(0),
            ledger_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rentals_opened: self.rentals_opened.load(Ordering::Relaxed),
            rentals_closed: self.rentals_closed.load(Ordering::Relaxed),
            revenue_cents_total: self.revenue_cents_total.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            permission_denied: self.permission_denied.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            activity_append_failures: self.activity_append_failures.load(Ordering::Relaxed),
            sync_echo_timeouts: self.sync_echo_timeouts.load(Ordering::Relaxed),
            ledger_latency_ms_total: self.ledger_latency_ms_total.load(Ordering::Relaxed),
            ledger_latency_ms_count: self.ledger_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录开租成功次数。
pub fn record_rental_opened() {
    metrics().rentals_opened.fetch_add(1, Ordering::Relaxed);
}

/// 记录结租成功次数与结算金额。
pub fn record_rental_closed(total_cost: f64) {
    let metrics = metrics();
    metrics.rentals_closed.fetch_add(1, Ordering::Relaxed);
    let cents = (total_cost * 100.0).round();
    if cents.is_finite() && cents > 0.0 {
        metrics
            .revenue_cents_total
            .fetch_add(cents as u64, Ordering::Relaxed);
    }
}

/// 记录条件写入冲突次数。
pub fn record_conflict() {
    metrics().conflicts.fetch_add(1, Ordering::Relaxed);
}

/// 记录权限拒绝次数。
pub fn record_permission_denied() {
    metrics().permission_denied.fetch_add(1, Ordering::Relaxed);
}

/// 记录输入校验失败次数。
pub fn record_validation_failure() {
    metrics().validation_failures.fetch_add(1, Ordering::Relaxed);
}

pub fn record_not_found() {
    metrics().not_found.fetch_add(1, Ordering::Relaxed);
}

/// 记录存储不可用次数。
pub fn record_store_failure() {
    metrics().store_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录活动日志追加失败次数（主操作已提交）。
pub fn record_activity_append_failure() {
    metrics()
        .activity_append_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录等待写入回显超时次数。
pub fn record_sync_echo_timeout() {
    metrics().sync_echo_timeouts.fetch_add(1, Ordering::Relaxed);
}

/// 记录 ledger 操作耗时（毫秒，含存储往返）。
pub fn record_ledger_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .ledger_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .ledger_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
