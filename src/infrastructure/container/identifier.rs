//! 标识符规范化
//!
//! 访问器与初始化器按规范化名称注册：先删除所有 `_`，再把 `.` 替换为 `_`。

/// 规范化标识符
///
/// ```
/// use xo_locator::infrastructure::container::normalize_id;
///
/// assert_eq!(normalize_id("template_manager"), "templatemanager");
/// assert_eq!(normalize_id("controller.admin"), "controller_admin");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '_')
        .map(|c| if c == '.' { '_' } else { c })
        .collect()
}

/// 绑定名称是否已经是规范化形式
pub fn is_binding_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscores_removed_before_dots_replaced() {
        assert_eq!(normalize_id("template_manager"), "templatemanager");
        assert_eq!(normalize_id("controller.admin"), "controller_admin");
        assert_eq!(normalize_id("a_b.c_d.e"), "ab_cd_e");
        assert_eq!(normalize_id("errorLogger"), "errorLogger");
        assert_eq!(normalize_id(""), "");
    }

    #[test]
    fn test_normalized_output_is_a_binding_name() {
        for id in ["x.y", "log.email", "_.._"] {
            assert!(!normalize_id(id).contains('.'));
        }
        assert!(is_binding_name("controller_admin"));
        assert!(!is_binding_name("controller.admin"));
        assert!(!is_binding_name(""));
    }
}
