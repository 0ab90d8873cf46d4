//! 默认服务绑定
//!
//! 为每个应用服务注册初始化器，绑定名称均为规范化后的形式。

use serde_json::Value;
use std::time::Duration;

use super::container::{Container, ContainerBuilder};
use crate::config::{AppConfig, Session};
use crate::errors::{BoxError, ContainerError};
use crate::services::{
    Application, Controller, ControllerKind, ErrorLogger, Logger, Routes, TemplateManager,
    TemplateUtils, XoClient,
};

fn controller_initializer(
    kind: ControllerKind,
) -> impl Fn(&Container) -> Result<Controller, BoxError> + Send + Sync + 'static {
    move |container: &Container| -> Result<Controller, BoxError> {
        Ok(Controller::new(kind, container)?)
    }
}

impl ContainerBuilder {
    /// 注册所有默认服务
    pub fn with_default_services(self) -> Self {
        let mut builder = self
            .initializer("application", |c| Ok(Application::new(c)?))
            .initializer("errorLogger", |c| Ok(ErrorLogger::new(c.get::<Logger>("logger")?)))
            .initializer("logger", |c| {
                let config = c.get::<AppConfig>("config")?;
                Ok(Logger::from_config(&config.log))
            })
            .initializer("routes", |c| {
                let config = c.get::<AppConfig>("config")?;
                Ok(Routes::new(&config.base_path)?)
            })
            .initializer("templatemanager", |c| {
                let config = c.get::<AppConfig>("config")?;
                let routes = c.get::<Routes>("routes")?;
                let application = c.get::<Application>("application")?;

                let user = serde_json::to_value(application.current_user())?;
                Ok(TemplateManager::new(
                    config.templates.dir.clone(),
                    config.templates.ttl.map(Duration::from_secs),
                    config.templates.cache.clone(),
                )
                .with_default_filters()
                .with_utils(TemplateUtils::new(routes))
                .with_variable("base_path", Value::String(config.base_path.clone()))
                .with_variable("user", user))
            })
            .initializer("xo", |c| {
                let config = c.get::<AppConfig>("config")?;
                let session = c.get_or("session", Session::default())?;
                Ok(XoClient::connect(config.xo.url.clone(), session.token()))
            });

        for kind in ControllerKind::ALL {
            let name = format!("controller_{}", kind.name());
            builder = builder.initializer(&name, controller_initializer(kind));
        }
        builder
    }
}

impl Container {
    /// 为一次请求创建容器：注册默认服务并预置 `config` 与 `session`
    pub fn for_request(config: AppConfig, session: Session) -> Result<Self, ContainerError> {
        let container = ContainerBuilder::new().with_default_services().build()?;
        container.set("config", config);
        container.set("session", session);
        tracing::debug!(scope = %container.scope_id(), "request container ready");
        Ok(container)
    }
}
