use std::sync::Arc;

use super::controller::Controller;
use super::routes::{RouteMatch, Routes};
use crate::config::{Session, SessionUser};
use crate::errors::{ContainerError, ServiceError};
use crate::infrastructure::container::Container;

/// 应用入口，持有当前请求的会话信息
#[derive(Debug)]
pub struct Application {
    session: Arc<Session>,
}

impl Application {
    /// 从容器读取 `session`，缺省时视为匿名会话
    pub fn new(container: &Container) -> Result<Self, ContainerError> {
        Ok(Self {
            session: container.get_or("session", Session::default())?,
        })
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.user.as_ref()
    }

    /// 按路径匹配路由，并从容器解析对应的控制器
    pub fn resolve_controller(
        &self,
        container: &Container,
        path: &str,
    ) -> Result<(Arc<Controller>, RouteMatch), ServiceError> {
        let routes = container.get::<Routes>("routes")?;
        let route = routes
            .match_path(path)
            .ok_or_else(|| ServiceError::NoRoute(path.to_string()))?;

        tracing::debug!(controller = %route.controller, action = %route.action, "dispatching");
        let controller = container.get::<Controller>(&route.controller_id())?;
        Ok((controller, route))
    }
}
