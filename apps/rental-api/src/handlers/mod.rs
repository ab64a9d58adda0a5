//! Handlers 模块

pub mod activity;
pub mod actors;
pub mod assets;
pub mod auth;
pub mod metrics;
pub mod rentals;
pub mod stats;

pub use activity::*;
pub use actors::*;
pub use assets::*;
pub use auth::*;
pub use metrics::*;
pub use rentals::*;
pub use stats::*;
