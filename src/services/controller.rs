use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::templates::TemplateManager;
use super::xo::XoClient;
use crate::errors::{ContainerError, ServiceError};
use crate::infrastructure::container::Container;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Admin,
    Home,
    Pools,
    Servers,
    Vms,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 5] = [
        ControllerKind::Admin,
        ControllerKind::Home,
        ControllerKind::Pools,
        ControllerKind::Servers,
        ControllerKind::Vms,
    ];

    /// 路由中的 `controller` 段
    pub fn name(self) -> &'static str {
        match self {
            ControllerKind::Admin => "admin",
            ControllerKind::Home => "home",
            ControllerKind::Pools => "pools",
            ControllerKind::Servers => "servers",
            ControllerKind::Vms => "vms",
        }
    }

    /// 容器标识符，如 `controller.admin`
    pub fn id(self) -> String {
        format!("controller.{}", self.name())
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControllerKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ServiceError::UnknownController(s.to_string()))
    }
}

/// 页面控制器
#[derive(Debug)]
pub struct Controller {
    kind: ControllerKind,
    xo: Arc<XoClient>,
    templates: Arc<TemplateManager>,
}

impl Controller {
    pub fn new(kind: ControllerKind, container: &Container) -> Result<Self, ContainerError> {
        Ok(Self {
            kind,
            xo: container.get("xo")?,
            templates: container.get("template_manager")?,
        })
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn xo(&self) -> &Arc<XoClient> {
        &self.xo
    }

    pub fn templates(&self) -> &Arc<TemplateManager> {
        &self.templates
    }

    /// 某个动作对应的模板名
    pub fn template_for(&self, action: &str) -> String {
        format!("{}/{}.html", self.kind.name(), action)
    }
}
