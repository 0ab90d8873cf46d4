//! 默认服务绑定的集成测试

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

use xo_locator::config::{AppConfig, LogConfig, Session, TemplatesConfig, XoConfig};
use xo_locator::infrastructure::{Container, ContainerError};
use xo_locator::services::logger::LogHandler;
use xo_locator::services::{
    Application, Controller, ControllerKind, ErrorLogger, Logger, Routes, TemplateManager,
    XoClient,
};
use xo_locator::ServiceError;

fn config() -> AppConfig {
    AppConfig {
        base_path: "/xo".to_string(),
        log: LogConfig::default(),
        templates: TemplatesConfig {
            ttl: Some(30),
            ..TemplatesConfig::default()
        },
        xo: XoConfig {
            url: "ws://xo.local/api/".to_string(),
        },
    }
}

#[test]
fn test_request_container_is_seeded() {
    let container = Container::for_request(config(), Session::default()).unwrap();

    assert_eq!(container.ids(), vec!["config", "session"]);
    assert_eq!(container.get::<AppConfig>("config").unwrap().base_path, "/xo");
}

#[test]
fn test_logger_without_handlers() {
    let container = Container::for_request(config(), Session::default()).unwrap();

    let logger = container.get::<Logger>("logger").unwrap();
    assert!(logger.handlers().is_empty());
}

#[test]
fn test_logger_handlers_follow_config() {
    let dir = tempdir().unwrap();
    let mut config = config();
    config.log = LogConfig {
        email: Some("ops@example.org".to_string()),
        file: Some(dir.path().join("xo.log")),
    };
    let container = Container::for_request(config, Session::default()).unwrap();

    let logger = container.get::<Logger>("logger").unwrap();
    assert_eq!(logger.handlers().len(), 2);
    assert!(matches!(logger.handlers()[0], LogHandler::Alert { ref to, .. } if to == "ops@example.org"));
    assert!(matches!(logger.handlers()[1], LogHandler::File { .. }));
}

#[test]
fn test_empty_log_settings_add_no_handlers() {
    let config = AppConfig::from_toml(
        "[log]\nemail = \"\"\nfile = \"\"\n\n[xo]\nurl = \"ws://xo.local/api/\"\n",
        "inline",
    )
    .unwrap()
    .validate()
    .unwrap();
    let container = Container::for_request(config, Session::default()).unwrap();

    let logger = container.get::<Logger>("logger").unwrap();
    assert!(logger.handlers().is_empty());

    let errors = container.get::<ErrorLogger>("errorLogger").unwrap();
    errors.report(&ContainerError::NotFound("missing".to_string())).unwrap();
}

#[test]
fn test_error_logger_shares_logger() {
    let container = Container::for_request(config(), Session::default()).unwrap();

    let errors = container.get::<ErrorLogger>("errorLogger").unwrap();
    let logger = container.get::<Logger>("logger").unwrap();

    assert!(Arc::ptr_eq(errors.logger(), &logger));
}

#[test]
fn test_overridden_logger_is_used_by_error_logger() {
    let container = Container::for_request(config(), Session::default()).unwrap();
    let custom = Arc::new(Logger::new("custom"));
    container.set_arc("logger", custom.clone());

    let errors = container.get::<ErrorLogger>("errorLogger").unwrap();

    assert!(Arc::ptr_eq(errors.logger(), &custom));
}

#[test]
fn test_xo_signs_in_with_session_token() {
    let anonymous = Container::for_request(config(), Session::default()).unwrap();
    let xo = anonymous.get::<XoClient>("xo").unwrap();
    assert_eq!(xo.url(), "ws://xo.local/api/");
    assert!(!xo.session.is_signed_in());

    let signed_in = Container::for_request(config(), Session::signed_in("admin", "t0k3n")).unwrap();
    let xo = signed_in.get::<XoClient>("xo").unwrap();
    assert_eq!(xo.session.token().as_deref(), Some("t0k3n"));
}

#[test]
fn test_template_manager_defaults() {
    let container = Container::for_request(config(), Session::signed_in("admin", "t0k3n")).unwrap();

    let tm = container.get::<TemplateManager>("template_manager").unwrap();

    assert_eq!(tm.ttl(), Some(Duration::from_secs(30)));
    assert_eq!(tm.cache(), None);
    assert_eq!(tm.filter_names(), vec!["count", "json"]);
    assert_eq!(tm.function_names(), vec!["generateSelectOptions", "url"]);
    assert_eq!(tm.variables()["base_path"], json!("/xo"));
    // 令牌不会出现在模板变量中
    assert_eq!(tm.variables()["user"], json!({"name": "admin"}));
    assert!(container.has("application"));
    assert!(container.has("routes"));
}

#[test]
fn test_anonymous_user_is_null_in_templates() {
    let container = Container::for_request(config(), Session::default()).unwrap();

    let tm = container.get::<TemplateManager>("template_manager").unwrap();

    assert_eq!(tm.variables()["user"], json!(null));
}

#[test]
fn test_every_controller_resolves() {
    let container = Container::for_request(config(), Session::default()).unwrap();

    for kind in ControllerKind::ALL {
        let controller = container.get::<Controller>(&kind.id()).unwrap();
        assert_eq!(controller.kind(), kind);
    }

    let admin = container.get::<Controller>("controller.admin").unwrap();
    let home = container.get::<Controller>("controller.home").unwrap();
    assert!(Arc::ptr_eq(admin.templates(), home.templates()));
    assert!(Arc::ptr_eq(admin.xo(), home.xo()));
}

#[test]
fn test_application_dispatches_by_route() {
    let container = Container::for_request(config(), Session::default()).unwrap();
    let application = container.get::<Application>("application").unwrap();

    let (controller, route) = application.resolve_controller(&container, "/xo/vms/show").unwrap();
    assert_eq!(controller.kind(), ControllerKind::Vms);
    assert_eq!(route.action, "show");
    assert_eq!(controller.template_for(&route.action), "vms/show.html");
    assert_eq!(
        controller.templates().template_path(&controller.template_for(&route.action)),
        std::path::Path::new("views").join("vms/show.html")
    );

    let (controller, route) = application.resolve_controller(&container, "/xo").unwrap();
    assert_eq!(controller.kind(), ControllerKind::Home);
    assert_eq!(route.action, "index");
}

#[test]
fn test_unknown_controller_is_not_found() {
    let container = Container::for_request(config(), Session::default()).unwrap();
    let application = container.get::<Application>("application").unwrap();

    let err = application.resolve_controller(&container, "/xo/storage").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Container(ContainerError::NotFound(ref id)) if id == "controller.storage"
    ));

    let err = application.resolve_controller(&container, "/elsewhere").unwrap_err();
    assert!(matches!(err, ServiceError::NoRoute(_)));
}

#[test]
fn test_missing_config_propagates_from_initializer() {
    let container = Container::builder().with_default_services().build().unwrap();

    let err = container.get::<Routes>("routes").unwrap_err();

    assert!(matches!(err, ContainerError::NotFound(ref id) if id == "config"));
    assert!(!container.has("routes"));
}

#[test]
fn test_new_scope_starts_clean() {
    let first = Container::for_request(config(), Session::default()).unwrap();
    let _ = first.get::<Logger>("logger").unwrap();

    let second = first.new_scope();
    assert!(second.ids().is_empty());
    second.set("config", config());
    let _ = second.get::<Routes>("routes").unwrap();
    assert_eq!(second.ids(), vec!["config", "routes"]);
}
