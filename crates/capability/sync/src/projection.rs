//! 本地视图上的排序投影、过滤与统计。
//!
//! 排序只依赖记录自身的时间字段，不依赖快照到达顺序。

use domain::AssetStatus;
use rental_storage::{ActivityEventRecord, ActorProfile, AssetRecord, RentalRecord};

/// 设备：入役时间倒序。
pub fn sort_assets(items: &mut [AssetRecord]) {
    items.sort_by(|a, b| {
        b.service_entry_date_ms
            .cmp(&a.service_entry_date_ms)
            .then_with(|| a.asset_id.cmp(&b.asset_id))
    });
}

/// 租赁：开始时间倒序。
pub fn sort_rentals(items: &mut [RentalRecord]) {
    items.sort_by(|a, b| {
        b.start_time_ms
            .cmp(&a.start_time_ms)
            .then_with(|| a.rental_id.cmp(&b.rental_id))
    });
}

/// 活动：时间戳倒序。稳定排序，同一毫秒保留存储端给出的先后。
pub fn sort_activity(items: &mut [ActivityEventRecord]) {
    items.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
}

pub fn sort_actors(items: &mut [ActorProfile]) {
    items.sort_by(|a, b| a.username.cmp(&b.username));
}

/// 设备列表过滤条件。
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    /// 名称子串，不区分大小写
    pub name_query: Option<String>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &AssetRecord) -> bool {
        if let Some(status) = self.status {
            if asset.status != status {
                return false;
            }
        }
        match self.name_query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => asset
                .name
                .to_lowercase()
                .contains(&query.to_lowercase()),
            _ => true,
        }
    }

    /// 按原顺序返回匹配的设备。
    pub fn apply(&self, assets: &[AssetRecord]) -> Vec<AssetRecord> {
        assets
            .iter()
            .filter(|asset| self.matches(asset))
            .cloned()
            .collect()
    }
}

/// 看板统计。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub active_rentals: usize,
    pub available_assets: usize,
    pub total_assets: usize,
    pub maintenance_assets: usize,
}

impl DashboardStats {
    pub fn compute(assets: &[AssetRecord], rentals: &[RentalRecord]) -> Self {
        let total_revenue: f64 = assets.iter().map(|asset| asset.total_revenue).sum();
        Self {
            total_revenue: (total_revenue * 100.0).round() / 100.0,
            active_rentals: rentals.iter().filter(|rental| rental.is_open()).count(),
            available_assets: count_status(assets, AssetStatus::Available),
            total_assets: assets.len(),
            maintenance_assets: count_status(assets, AssetStatus::Maintenance),
        }
    }
}

fn count_status(assets: &[AssetRecord], status: AssetStatus) -> usize {
    assets.iter().filter(|asset| asset.status == status).count()
}
