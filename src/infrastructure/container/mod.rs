//! 服务容器
//!
//! 按字符串标识符懒解析并缓存应用组件。

pub mod builder;
pub mod identifier;
pub mod locator;

use std::any::Any;
use std::sync::Arc;

pub use builder::ContainerBuilder;
pub use identifier::normalize_id;
pub use locator::{Container, ContainerStats};

/// 容器中保存的类型擦除值
pub type Service = Arc<dyn Any + Send + Sync>;

/// 未缓存标识符的解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// 每次解析都调用，不缓存
    Accessor,
    /// 首次解析时调用，结果缓存到容器中
    Initializer,
    /// 按原始标识符构造新实例，不缓存
    Constructor,
}
