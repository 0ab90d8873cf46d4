//! 模板管理器
//!
//! 渲染本身由外部模板引擎完成，这里只保存目录、缓存设置以及
//! 默认的过滤器、函数和变量。

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::routes::Routes;
use crate::errors::ServiceError;

/// 模板过滤器
pub type Filter = fn(&Value) -> Result<Value, ServiceError>;

fn count_filter(value: &Value) -> Result<Value, ServiceError> {
    let count = match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        Value::Null => 0,
        _ => 1,
    };
    Ok(Value::from(count))
}

fn json_filter(value: &Value) -> Result<Value, ServiceError> {
    Ok(Value::String(serde_json::to_string(value)?))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// 模板中可调用的辅助函数
#[derive(Debug, Clone)]
pub struct TemplateUtils {
    routes: Arc<Routes>,
}

impl TemplateUtils {
    pub fn new(routes: Arc<Routes>) -> Self {
        Self { routes }
    }

    /// 生成 `<option>` 列表，`options` 的键为值、值为显示文本
    pub fn generate_select_options(&self, options: &Map<String, Value>, selected: Option<&str>) -> String {
        options
            .iter()
            .map(|(value, label)| {
                let label = match label {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let marker = if selected == Some(value.as_str()) {
                    " selected=\"selected\""
                } else {
                    ""
                };
                format!(
                    "<option value=\"{}\"{}>{}</option>",
                    escape_html(value),
                    marker,
                    escape_html(&label)
                )
            })
            .collect()
    }

    pub fn url(&self, controller: &str, action: Option<&str>) -> Result<String, ServiceError> {
        self.routes.url(controller, action)
    }
}

#[derive(Debug)]
pub struct TemplateManager {
    dir: PathBuf,
    ttl: Option<Duration>,
    cache: Option<PathBuf>,
    filters: BTreeMap<String, Filter>,
    utils: Option<TemplateUtils>,
    variables: Map<String, Value>,
}

impl TemplateManager {
    pub const FUNCTIONS: [&'static str; 2] = ["generateSelectOptions", "url"];

    pub fn new(dir: impl Into<PathBuf>, ttl: Option<Duration>, cache: Option<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            cache,
            filters: BTreeMap::new(),
            utils: None,
            variables: Map::new(),
        }
    }

    /// 加入 `count` 与 `json` 过滤器（不覆盖已有同名过滤器）
    pub fn with_default_filters(mut self) -> Self {
        self.filters.entry("count".to_string()).or_insert(count_filter as Filter);
        self.filters.entry("json".to_string()).or_insert(json_filter as Filter);
        self
    }

    /// 绑定 `generateSelectOptions` 与 `url` 函数
    pub fn with_utils(mut self, utils: TemplateUtils) -> Self {
        self.utils.get_or_insert(utils);
        self
    }

    /// 加入默认变量（不覆盖已有变量）
    pub fn with_variable(mut self, name: &str, value: Value) -> Self {
        self.variables.entry(name.to_string()).or_insert(value);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn cache(&self) -> Option<&Path> {
        self.cache.as_deref()
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }

    pub fn function_names(&self) -> Vec<&'static str> {
        if self.utils.is_some() {
            Self::FUNCTIONS.to_vec()
        } else {
            Vec::new()
        }
    }

    pub fn utils(&self) -> Option<&TemplateUtils> {
        self.utils.as_ref()
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// 应用过滤器；未知过滤器返回 `None`
    pub fn apply_filter(&self, name: &str, value: &Value) -> Option<Result<Value, ServiceError>> {
        self.filters.get(name).map(|filter| filter(value))
    }

    /// 模板文件路径
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// 渲染上下文：默认变量被同名的调用方变量覆盖
    pub fn context(&self, locals: Map<String, Value>) -> Map<String, Value> {
        let mut context = self.variables.clone();
        context.extend(locals);
        context
    }
}
