//! # Rental Storage 模块
//!
//! 本模块提供租赁系统的存储抽象层，支持内存与 PostgreSQL 两种后端。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：四个集合的异步 Trait 接口与存储端时钟
//! 2. **数据模型层** (`models.rs`)：操作者、设备、租赁、活动日志记录
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：写入前的兜底校验
//! 5. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 6. **变更推送** (`changefeed.rs`)：每集合一条 watch 通道，发布整集合快照
//! 7. **实现层**：
//!    - `in_memory/`：内存存储实现（测试、演示、未配置数据库时）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 核心约束
//!
//! - **条件写入**：设备状态只能通过带谓词的接口修改，谓词不成立返回 `false` / `None`
//! - **跨集合原子性**：开租、结租在存储端一次完成，不存在只写了一半的中间状态
//! - **营收累加**：结租时由存储端原子累加，不做读改写
//! - **提交顺序**：同一集合的快照按提交顺序发布
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use rental_storage::{InMemoryBackend, AssetStore};
//!
//! let backend = InMemoryBackend::new();
//! let stores = backend.stores();
//! let assets = stores.assets.list_assets().await?;
//! let mut receiver = stores.feed.subscribe_assets();
//! ```

pub mod changefeed;
pub mod clock;
pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;
pub mod validation;

pub use changefeed::*;
pub use clock::*;
pub use connection::*;
pub use error::*;
pub use in_memory::*;
pub use models::*;
pub use postgres::*;
pub use traits::*;
