pub mod app_config;
pub mod loader;

// Re-export commonly used types
pub use app_config::{AppConfig, LogConfig, Session, SessionUser, TemplatesConfig, XoConfig};
pub use loader::ConfigLoader;

pub use app_config::{CONFIG_FILE_NAME, USER_CONFIG_PATH};
