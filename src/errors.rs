use thiserror::Error;

/// 工厂函数返回的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 容器解析错误
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 没有缓存条目、没有访问器、没有初始化器、没有可构造类型，也没有默认值
    #[error("no such entry ({0})")]
    NotFound(String),

    /// 同一线程在解析过程中再次请求了正在解析的标识符
    #[error("cyclic dependency while resolving '{id}': {}", chain.join(" -> "))]
    CyclicDependency { id: String, chain: Vec<String> },

    /// 条目存在，但类型与请求的不一致
    #[error("entry '{id}' is not a {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    /// 访问器、初始化器或构造器自身失败
    #[error("failed to create '{id}': {source}")]
    CreationFailed {
        id: String,
        #[source]
        source: BoxError,
    },

    /// 绑定名称必须是规范化后的形式（不含 '.'）
    #[error("binding name '{0}' is not normalized")]
    InvalidBindingName(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Required configuration field '{0}' is missing or invalid")]
    FieldMissing(String),
}

/// 协作服务构造错误
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid route pattern: {0}")]
    Route(#[from] regex::Error),
    #[error("Unknown controller '{0}'")]
    UnknownController(String),
    #[error("No route matches '{0}'")]
    NoRoute(String),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("I/O error while {0}: {1}")]
    IO(String, #[source] std::io::Error),
    #[error("Template value could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}
