//! # Rental Ledger
//!
//! 租赁核心：设备登记、租赁账本、活动日志、操作者目录与权限闸门。
//!
//! - 所有写操作先经过 `policy::authorize`
//! - 涉及设备状态的写入只走存储端条件接口
//! - 成功的写操作之后追加一条活动事件
//! - 结果以 `LedgerError` 返回，五类错误对调用方可区分
//!
//! 读路径不在这里：客户端通过 rental-sync 订阅集合快照。

pub mod activity;
pub mod actors;
pub mod error;
pub mod ledger;
pub mod policy;
pub mod registry;
pub mod validation;

pub use activity::ActivityLog;
pub use actors::{ActorDirectory, NewActor};
pub use error::LedgerError;
pub use ledger::{ClosedRental, OpenRental, RentalLedger};
pub use policy::authorize;
pub use registry::{AssetRegistry, NewAsset};

use rental_storage::Stores;

/// 装配完成的租赁服务。
#[derive(Clone)]
pub struct RentalService {
    pub registry: AssetRegistry,
    pub ledger: RentalLedger,
    pub actors: ActorDirectory,
    pub activity: ActivityLog,
}

impl RentalService {
    pub fn new(stores: &Stores) -> Self {
        let activity = ActivityLog::new(stores.activity.clone());
        Self {
            registry: AssetRegistry::new(stores, activity.clone()),
            ledger: RentalLedger::new(stores, activity.clone()),
            actors: ActorDirectory::new(stores, activity.clone()),
            activity,
        }
    }
}
