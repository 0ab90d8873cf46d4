use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

use super::app_config::{
    AppConfig, Session, CONFIG_FILE_NAME, ENV_BASE_PATH, ENV_CONFIG_PATH, ENV_SESSION_TOKEN,
    ENV_SESSION_USER, ENV_XO_URL, USER_CONFIG_PATH,
};

/// Configuration loader responsible for loading config from files and environment
#[derive(Debug, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Create a config loader reading an explicit file; the file must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Load configuration plus the session derived from the environment
    pub fn load(&self) -> Result<(AppConfig, Session), ConfigError> {
        let env_map = self.collect_env_vars();
        let config = self.load_with_env(&env_map)?;
        Ok((config, Session::from_env(&env_map)))
    }

    /// Load configuration using a pre-collected environment map
    pub fn load_with_env(&self, env_map: &HashMap<String, String>) -> Result<AppConfig, ConfigError> {
        let explicit = self
            .path
            .clone()
            .or_else(|| env_map.get(ENV_CONFIG_PATH).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => self.read_file(&path)?,
            None => {
                let path = self.default_path();
                if path.exists() {
                    self.read_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    AppConfig::default()
                }
            }
        };

        config.apply_env(env_map);
        config.validate()
    }

    /// Default location with tilde expansion
    pub fn default_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(USER_CONFIG_PATH);
        let base = if expanded.starts_with('~') {
            dirs::home_dir()
                .map(|home| home.join(".config/xo-locator"))
                .unwrap_or_else(|| PathBuf::from(".xo-locator"))
        } else {
            PathBuf::from(expanded.as_ref())
        };
        base.join(CONFIG_FILE_NAME)
    }

    fn read_file(&self, path: &Path) -> Result<AppConfig, ConfigError> {
        let origin = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead(origin.clone(), e))?;
        tracing::info!(path = %origin, "loaded configuration");
        AppConfig::from_toml(&content, &origin)
    }

    fn collect_env_vars(&self) -> HashMap<String, String> {
        let env_keys = [
            ENV_CONFIG_PATH,
            ENV_XO_URL,
            ENV_BASE_PATH,
            ENV_SESSION_TOKEN,
            ENV_SESSION_USER,
        ];

        let mut env_map = HashMap::new();
        for key in &env_keys {
            if let Ok(value) = env::var(key) {
                env_map.insert(key.to_string(), value);
            }
        }
        env_map
    }
}
