//! 容器构造的协作服务
//!
//! 这些服务只实现各自的构造约定，容器并不了解它们的内部细节。

pub mod application;
pub mod controller;
pub mod logger;
pub mod routes;
pub mod templates;
pub mod xo;

pub use application::Application;
pub use controller::{Controller, ControllerKind};
pub use logger::{ErrorLogger, LogHandler, Logger};
pub use routes::{RouteMatch, Routes};
pub use templates::{TemplateManager, TemplateUtils};
pub use xo::XoClient;
