use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf};

use crate::errors::ConfigError;

// Configuration location constants
pub const USER_CONFIG_PATH: &str = "~/.config/xo-locator";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Environment overrides
pub const ENV_CONFIG_PATH: &str = "XO_LOCATOR_CONFIG";
pub const ENV_XO_URL: &str = "XO_URL";
pub const ENV_BASE_PATH: &str = "XO_BASE_PATH";
pub const ENV_SESSION_TOKEN: &str = "XO_SESSION_TOKEN";
pub const ENV_SESSION_USER: &str = "XO_SESSION_USER";

/// Main Application Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL prefix the application is mounted under, without trailing slash
    pub base_path: String,
    pub log: LogConfig,
    pub templates: TemplatesConfig,
    pub xo: XoConfig,
}

/// Logger handlers, both optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Alert recipient for warnings and above
    pub email: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub dir: PathBuf,
    /// Seconds a compiled template stays fresh; `None` never expires
    pub ttl: Option<u64>,
    pub cache: Option<PathBuf>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("views"),
            ttl: None,
            cache: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XoConfig {
    pub url: String,
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(source: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::TomlParse(origin.to_string(), e))
    }

    /// Apply environment overrides; environment wins over file values
    pub fn apply_env(&mut self, env_map: &HashMap<String, String>) {
        if let Some(url) = env_map.get(ENV_XO_URL) {
            self.xo.url = url.clone();
        }
        if let Some(base) = env_map.get(ENV_BASE_PATH) {
            self.base_path = base.clone();
        }
    }

    /// Check required fields and normalize the base path
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.xo.url.trim().is_empty() {
            return Err(ConfigError::FieldMissing("xo.url".to_string()));
        }
        while self.base_path.ends_with('/') {
            self.base_path.pop();
        }
        Ok(self)
    }

    /// Dotted-key lookup, e.g. `log.email` or `templates.ttl`
    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        match key {
            "base_path" => Some(self.base_path.clone()),
            "log.email" => self.log.email.clone(),
            "log.file" => path(&self.log.file),
            "templates.dir" => Some(self.templates.dir.display().to_string()),
            "templates.ttl" => self.templates.ttl.map(|ttl| ttl.to_string()),
            "templates.cache" => path(&self.templates.cache),
            "xo.url" => Some(self.xo.url.clone()),
            _ => None,
        }
    }
}

/// Signed-in user carried by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub name: String,
    #[serde(skip_serializing)]
    pub token: String,
}

/// Per-request session state handed to the container explicitly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn signed_in(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: Some(SessionUser {
                name: name.into(),
                token: token.into(),
            }),
        }
    }

    /// `XO_SESSION_TOKEN` signs the session in; `XO_SESSION_USER` names the user
    pub fn from_env(env_map: &HashMap<String, String>) -> Self {
        match env_map.get(ENV_SESSION_TOKEN).filter(|token| !token.is_empty()) {
            Some(token) => {
                let name = env_map
                    .get(ENV_SESSION_USER)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                Self::signed_in(name, token.clone())
            }
            None => Self::default(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
