//! 路由：一个基于模式的构建器和一个基于正则的匹配器

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::errors::ServiceError;

pub const DEFAULT_CONTROLLER: &str = "home";
pub const DEFAULT_ACTION: &str = "index";

const PATH_PATTERN: &str = r"^/(?:(?<controller>[a-z]+)(?:/(?<action>[a-z]+))?/?)?$";

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub controller: String,
    pub action: String,
}

impl RouteMatch {
    /// 处理该路由的控制器在容器中的标识符
    pub fn controller_id(&self) -> String {
        format!("controller.{}", self.controller)
    }
}

#[derive(Debug)]
pub struct Routes {
    base_path: String,
    /// 构建器模式，`:name` 为占位符
    pattern: String,
    builder_defaults: HashMap<&'static str, &'static str>,
    matcher: Regex,
    matcher_defaults: HashMap<&'static str, &'static str>,
}

impl Routes {
    pub fn new(base_path: &str) -> Result<Self, ServiceError> {
        let base_path = base_path.trim_end_matches('/').to_string();
        let matcher = RegexBuilder::new(PATH_PATTERN)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern: format!("{base_path}/:controller/:action"),
            base_path,
            builder_defaults: HashMap::from([("action", DEFAULT_ACTION)]),
            matcher,
            matcher_defaults: HashMap::from([
                ("controller", DEFAULT_CONTROLLER),
                ("action", DEFAULT_ACTION),
            ]),
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 匹配请求路径；先去掉 `base_path` 前缀，不在其下的路径不匹配
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let relative = if self.base_path.is_empty() {
            path
        } else {
            match path.strip_prefix(self.base_path.as_str()) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ => return None,
            }
        };
        let relative = if relative.is_empty() { "/" } else { relative };

        let captures = self.matcher.captures(relative)?;
        let segment = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_else(|| self.matcher_defaults[name].to_string())
        };

        Some(RouteMatch {
            controller: segment("controller"),
            action: segment("action"),
        })
    }

    /// 按模式构建 URL，缺省的参数取构建器默认值
    pub fn build(&self, params: &HashMap<&str, &str>) -> Result<String, ServiceError> {
        let mut url = String::with_capacity(self.pattern.len());
        for (i, part) in self.pattern.split('/').enumerate() {
            if i > 0 {
                url.push('/');
            }
            match part.strip_prefix(':') {
                Some(name) => {
                    let value = params
                        .get(name)
                        .copied()
                        .or_else(|| self.builder_defaults.get(name).copied())
                        .ok_or_else(|| ServiceError::NoRoute(format!(":{name} in {}", self.pattern)))?;
                    url.push_str(value);
                }
                None => url.push_str(part),
            }
        }
        Ok(url)
    }

    /// `build` 的便捷形式
    pub fn url(&self, controller: &str, action: Option<&str>) -> Result<String, ServiceError> {
        let mut params = HashMap::from([("controller", controller)]);
        if let Some(action) = action {
            params.insert("action", action);
        }
        self.build(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(controller: &str, action: &str) -> Option<RouteMatch> {
        Some(RouteMatch {
            controller: controller.to_string(),
            action: action.to_string(),
        })
    }

    #[test]
    fn test_match_applies_defaults() {
        let routes = Routes::new("").unwrap();

        assert_eq!(routes.match_path("/"), route("home", "index"));
        assert_eq!(routes.match_path(""), route("home", "index"));
        assert_eq!(routes.match_path("/vms"), route("vms", "index"));
        assert_eq!(routes.match_path("/vms/"), route("vms", "index"));
        assert_eq!(routes.match_path("/Pools/Show"), route("pools", "show"));
    }

    #[test]
    fn test_match_rejects_other_shapes() {
        let routes = Routes::new("").unwrap();

        assert_eq!(routes.match_path("/vms/show/extra"), None);
        assert_eq!(routes.match_path("/v2"), None);
        assert_eq!(routes.match_path("vms"), None);
    }

    #[test]
    fn test_match_strips_base_path() {
        let routes = Routes::new("/xo/").unwrap();

        assert_eq!(routes.base_path(), "/xo");
        assert_eq!(routes.match_path("/xo"), route("home", "index"));
        assert_eq!(routes.match_path("/xo/servers/list"), route("servers", "list"));
        assert_eq!(routes.match_path("/xoo"), None);
    }

    #[test]
    fn test_build_uses_default_action() {
        let routes = Routes::new("/xo").unwrap();

        assert_eq!(routes.pattern(), "/xo/:controller/:action");
        assert_eq!(routes.url("vms", None).unwrap(), "/xo/vms/index");
        assert_eq!(routes.url("vms", Some("show")).unwrap(), "/xo/vms/show");
        assert!(matches!(
            routes.build(&HashMap::new()),
            Err(ServiceError::NoRoute(_))
        ));
    }

    #[test]
    fn test_controller_id() {
        assert_eq!(route("admin", "index").unwrap().controller_id(), "controller.admin");
    }
}
