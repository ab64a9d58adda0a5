//! 工具模块

pub mod echo;
pub mod response;
pub mod validation;
