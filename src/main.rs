mod args;

use anyhow::{anyhow, Context};
use clap::Parser;

use args::{Args, Command};
use xo_locator::config::{ConfigLoader, Session};
use xo_locator::infrastructure::Container;
use xo_locator::logging::{init_logging, LoggingConfig};
use xo_locator::services::{Application, ErrorLogger, Logger, Routes, TemplateManager, XoClient};
use xo_locator::AppConfig;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };
    init_logging(logging).map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let (config, mut session) = loader.load().context("loading configuration")?;
    if let Some(token) = args.token {
        session = Session::signed_in(args.user.unwrap_or_else(|| "unknown".to_string()), token);
    }

    let container = Container::for_request(config, session)?;
    let result = run(&container, args.command);

    if let Err(err) = &result {
        if let Ok(errors) = container.get::<ErrorLogger>("errorLogger") {
            if let Err(report_err) = errors.report(&**err) {
                tracing::warn!(error = %report_err, "failed to report error");
            }
        }
    }
    result
}

fn run(container: &Container, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Resolve { ids } => {
            for id in ids {
                println!("{id}: {}", describe(container, &id)?);
            }
        }
        Command::Route { path } => {
            let application = container.get::<Application>("application")?;
            let (controller, route) = application.resolve_controller(container, &path)?;
            let routes = container.get::<Routes>("routes")?;
            println!("controller: {}", route.controller_id());
            println!("action:     {}", route.action);
            let template = controller.template_for(&route.action);
            println!(
                "template:   {}",
                controller.templates().template_path(&template).display()
            );
            println!("url:        {}", routes.url(&route.controller, Some(&route.action))?);
        }
        Command::Config { key } => {
            let config = container.get::<AppConfig>("config")?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => println!("{key} is not set"),
            }
        }
    }
    Ok(())
}

/// 解析标识符并生成可读的描述
fn describe(container: &Container, id: &str) -> anyhow::Result<String> {
    let binding = container.binding_for(id);
    let value = container.get_any(id)?;

    if let Some(logger) = value.downcast_ref::<Logger>() {
        return Ok(format!("logger '{}' with {} handler(s)", logger.name(), logger.handlers().len()));
    }
    if let Some(routes) = value.downcast_ref::<Routes>() {
        return Ok(format!("routes {}", routes.pattern()));
    }
    if let Some(xo) = value.downcast_ref::<XoClient>() {
        let state = if xo.session.is_signed_in() { "signed in" } else { "anonymous" };
        return Ok(format!("xo client {} ({state})", xo.url()));
    }
    if let Some(tm) = value.downcast_ref::<TemplateManager>() {
        return Ok(format!(
            "templates in {} (filters: {}, functions: {})",
            tm.dir().display(),
            tm.filter_names().join(", "),
            tm.function_names().join(", ")
        ));
    }
    if let Some(app) = value.downcast_ref::<Application>() {
        let user = app.current_user().map(|u| u.name.as_str()).unwrap_or("anonymous");
        return Ok(format!("application (user: {user})"));
    }
    if let Some(config) = value.downcast_ref::<AppConfig>() {
        return Ok(format!("{config:?}"));
    }

    Ok(match binding {
        Some((kind, type_name)) => format!("{type_name} via {kind:?}"),
        None => "<opaque value>".to_string(),
    })
}
