//! 按字符串标识符懒解析、并缓存应用组件的服务容器

pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod logging;
pub mod services;

// Re-export commonly used items for convenience
pub use config::{AppConfig, Session};
pub use errors::{ContainerError, ServiceError};
pub use infrastructure::{Container, ContainerBuilder};
