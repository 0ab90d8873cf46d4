//! 基础设施层
//!
//! - 服务容器
//! - 默认服务绑定

// 容器实现
pub mod container;
pub mod provider;

// 重新导出API
pub use container::{normalize_id, BindingKind, Container, ContainerBuilder, ContainerStats, Service};
pub use crate::errors::ContainerError;
