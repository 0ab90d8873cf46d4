//! 容器构建器
//!
//! 三张显式映射表在构建时一次性填好，之后只读：
//! - 访问器：每次 `get` 都重新调用，不缓存
//! - 初始化器：首次调用后通过 `set` 缓存
//! - 构造器：按原始标识符注册的无参构造，每次返回新实例

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::identifier::{is_binding_name, normalize_id};
use super::locator::Container;
use super::{BindingKind, Service};
use crate::errors::{BoxError, ContainerError};

/// 类型擦除后的工厂函数
pub(crate) type Factory = Arc<dyn Fn(&Container) -> Result<Service, BoxError> + Send + Sync>;

/// 类型擦除后的无参构造函数
pub(crate) type Constructor = Arc<dyn Fn() -> Service + Send + Sync>;

/// 一个已注册的绑定
#[derive(Clone)]
pub(crate) struct Binding<F> {
    pub(crate) call: F,
    pub(crate) type_name: &'static str,
}

/// 只读的绑定表，多个作用域容器共享同一份
#[derive(Default)]
pub(crate) struct Bindings {
    pub(crate) accessors: HashMap<String, Binding<Factory>>,
    pub(crate) initializers: HashMap<String, Binding<Factory>>,
    pub(crate) constructors: HashMap<String, Binding<Constructor>>,
}

impl Bindings {
    /// 查找标识符对应的绑定类型及其产物类型，顺序与解析顺序一致
    pub(crate) fn describe(&self, id: &str) -> Option<(BindingKind, &'static str)> {
        let name = normalize_id(id);
        if let Some(binding) = self.accessors.get(&name) {
            return Some((BindingKind::Accessor, binding.type_name));
        }
        if let Some(binding) = self.initializers.get(&name) {
            return Some((BindingKind::Initializer, binding.type_name));
        }
        self.constructors
            .get(id)
            .map(|binding| (BindingKind::Constructor, binding.type_name))
    }
}

fn erase<T, F>(factory: F) -> Binding<Factory>
where
    F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
    T: Any + Send + Sync,
{
    Binding {
        call: Arc::new(move |container: &Container| {
            factory(container).map(|value| Arc::new(value) as Service)
        }),
        type_name: std::any::type_name::<T>(),
    }
}

/// 容器构建器
#[derive(Default)]
pub struct ContainerBuilder {
    bindings: Bindings,
    invalid: Vec<String>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册访问器（不缓存，每次 `get` 都调用）
    ///
    /// `name` 必须是规范化后的名称，例如 `controller_admin` 而不是 `controller.admin`。
    pub fn accessor<T, F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        if self.check_name(name) {
            self.bindings.accessors.insert(name.to_string(), erase(factory));
        }
        self
    }

    /// 注册初始化器（首次调用后缓存）
    ///
    /// `name` 必须是规范化后的名称，例如 `templatemanager`。
    pub fn initializer<T, F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&Container) -> Result<T, BoxError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        if self.check_name(name) {
            self.bindings
                .initializers
                .insert(name.to_string(), erase(factory));
        }
        self
    }

    /// 注册可直接构造的类型，按原始标识符查找
    pub fn constructible<T>(mut self, id: &str) -> Self
    where
        T: Default + Any + Send + Sync,
    {
        self.bindings.constructors.insert(
            id.to_string(),
            Binding {
                call: Arc::new(|| Arc::new(T::default()) as Service),
                type_name: std::any::type_name::<T>(),
            },
        );
        self
    }

    /// 构建容器；任何未规范化的绑定名称都会在这里报错
    pub fn build(self) -> Result<Container, ContainerError> {
        if let Some(name) = self.invalid.into_iter().next() {
            return Err(ContainerError::InvalidBindingName(name));
        }
        Ok(Container::from_bindings(Arc::new(self.bindings)))
    }

    fn check_name(&mut self, name: &str) -> bool {
        if is_binding_name(name) {
            true
        } else {
            self.invalid.push(name.to_string());
            false
        }
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("accessors", &self.bindings.accessors.len())
            .field("initializers", &self.bindings.initializers.len())
            .field("constructors", &self.bindings.constructors.len())
            .field("invalid", &self.invalid)
            .finish()
    }
}
