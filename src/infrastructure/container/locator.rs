//! 服务定位器
//!
//! 解析顺序（先命中者胜出）：
//! 1. 已缓存的条目（按键是否存在判断，缓存的 `None` 也会原样返回）
//! 2. 访问器：每次调用，不缓存
//! 3. 初始化器：调用一次，结果经 `set` 缓存
//! 4. 构造器：按原始标识符构造新实例，不缓存
//! 5. 调用方给出的默认值，否则 `NotFound`

use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use uuid::Uuid;

use super::builder::{Binding, Bindings, ContainerBuilder, Factory};
use super::identifier::normalize_id;
use super::{BindingKind, Service};
use crate::errors::ContainerError;

/// 单个作用域（通常是一次请求）的服务容器
pub struct Container {
    scope_id: Uuid,
    bindings: Arc<Bindings>,
    entries: DashMap<String, Service>,
    /// 正在解析的标识符，按线程区分
    resolving: Mutex<Vec<(ThreadId, String)>>,
    stats: InnerStats,
}

/// 内部容器统计信息（原子计数器）
#[derive(Default)]
struct InnerStats {
    total_resolutions: AtomicUsize,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

impl Container {
    /// 没有任何绑定的空容器，只能通过 `set` 填充
    pub fn new() -> Self {
        Self::from_bindings(Arc::new(Bindings::default()))
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_bindings(bindings: Arc<Bindings>) -> Self {
        Self {
            scope_id: Uuid::new_v4(),
            bindings,
            entries: DashMap::new(),
            resolving: Mutex::new(Vec::new()),
            stats: InnerStats::default(),
        }
    }

    /// 以相同的绑定创建一个新的、没有任何缓存条目的作用域
    pub fn new_scope(&self) -> Self {
        Self::from_bindings(self.bindings.clone())
    }

    pub fn scope_id(&self) -> Uuid {
        self.scope_id
    }

    /// 解析并向下转型为 `T`
    pub fn get<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>, ContainerError> {
        self.get_any(id)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// 解析；只有 `id` 本身不存在时才返回 `default`
    ///
    /// 初始化器内部依赖缺失导致的 `NotFound` 以及其他错误照常传播。
    pub fn get_or<T: Any + Send + Sync>(
        &self,
        id: &str,
        default: T,
    ) -> Result<Arc<T>, ContainerError> {
        match self.get::<T>(id) {
            Err(ContainerError::NotFound(missing)) if missing == id => Ok(Arc::new(default)),
            other => other,
        }
    }

    /// 解析为类型擦除的值
    pub fn get_any(&self, id: &str) -> Result<Service, ContainerError> {
        self.stats.total_resolutions.fetch_add(1, Ordering::Relaxed);

        if let Some(entry) = self.entries.get(id) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.value().clone());
        }
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let name = normalize_id(id);

        if let Some(accessor) = self.bindings.accessors.get(&name) {
            let _guard = self.enter(id)?;
            tracing::debug!(scope = %self.scope_id, id, "resolving through accessor");
            return self.invoke(id, accessor);
        }

        if let Some(initializer) = self.bindings.initializers.get(&name) {
            let value = {
                let _guard = self.enter(id)?;
                tracing::debug!(
                    scope = %self.scope_id,
                    id,
                    service = initializer.type_name,
                    "initializing"
                );
                self.invoke(id, initializer)?
            };
            self.set_arc(id, value.clone());
            return Ok(value);
        }

        if let Some(constructor) = self.bindings.constructors.get(id) {
            tracing::debug!(scope = %self.scope_id, id, "constructing fresh instance");
            return Ok((constructor.call)());
        }

        Err(ContainerError::NotFound(id.to_string()))
    }

    /// 无条件覆盖条目
    pub fn set<T: Any + Send + Sync>(&self, id: impl Into<String>, value: T) {
        self.set_arc(id, Arc::new(value));
    }

    /// 存入已共享的值，之后的 `get` 返回同一个 `Arc`
    pub fn set_arc(&self, id: impl Into<String>, value: Service) {
        self.entries.insert(id.into(), value);
    }

    /// 是否已有缓存条目
    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// 删除缓存条目，下一次 `get` 将重新解析
    pub fn remove(&self, id: &str) -> Option<Service> {
        self.entries.remove(id).map(|(_, value)| value)
    }

    /// 已缓存的标识符（排序后）
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// 标识符未缓存时会经由哪种绑定解析
    pub fn binding_for(&self, id: &str) -> Option<(BindingKind, &'static str)> {
        self.bindings.describe(id)
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.stats.total_resolutions.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.stats.cache_misses.load(Ordering::Relaxed),
        }
    }

    fn invoke(&self, id: &str, binding: &Binding<Factory>) -> Result<Service, ContainerError> {
        (binding.call)(self).map_err(|source| match source.downcast::<ContainerError>() {
            Ok(inner) => *inner,
            Err(source) => ContainerError::CreationFailed {
                id: id.to_string(),
                source,
            },
        })
    }

    /// 把标识符压入当前线程的解析栈；若已在栈中则报告循环依赖
    fn enter(&self, id: &str) -> Result<ResolvingGuard<'_>, ContainerError> {
        let thread = thread::current().id();
        let mut stack = self.resolving.lock();

        if stack.iter().any(|(t, pending)| *t == thread && pending == id) {
            let mut chain: Vec<String> = stack
                .iter()
                .filter(|(t, _)| *t == thread)
                .map(|(_, pending)| pending.clone())
                .collect();
            chain.push(id.to_string());
            tracing::warn!(scope = %self.scope_id, id, chain = ?chain, "cyclic dependency");
            return Err(ContainerError::CyclicDependency {
                id: id.to_string(),
                chain,
            });
        }

        stack.push((thread, id.to_string()));
        Ok(ResolvingGuard {
            container: self,
            thread,
        })
    }
}

/// 离开作用域时弹出当前线程最近压入的标识符
struct ResolvingGuard<'a> {
    container: &'a Container,
    thread: ThreadId,
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.container.resolving.lock();
        if let Some(pos) = stack.iter().rposition(|(t, _)| *t == self.thread) {
            stack.remove(pos);
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("scope_id", &self.scope_id)
            .field("entries", &self.ids())
            .finish()
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStats {
    pub total_resolutions: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl ContainerStats {
    /// 获取总解析次数
    pub fn total(&self) -> usize {
        self.total_resolutions
    }

    /// 获取缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total() as f64
        }
    }
}
