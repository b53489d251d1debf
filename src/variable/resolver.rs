use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::variable::types::VariableContext;

fn var_regex() -> &'static Regex {
    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    VAR_REGEX.get_or_init(|| Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").unwrap())
}

fn env_regex() -> &'static Regex {
    static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
    ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap())
}

/// 变量替换器
pub struct VariableResolver;

impl VariableResolver {
    /// 替换 `{{variable}}`，未定义的变量保持原样
    pub fn substitute(text: &str, context: &VariableContext) -> String {
        var_regex()
            .replace_all(text, |caps: &Captures| {
                context.get(&caps[1]).unwrap_or(&caps[0]).to_string()
            })
            .into_owned()
    }

    /// 替换系统环境变量 `${VAR}`，未设置的保持原样
    pub fn resolve_env_vars(text: &str) -> String {
        env_regex()
            .replace_all(text, |caps: &Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
            })
            .into_owned()
    }

    /// 先解析环境变量，再替换自定义变量
    pub fn resolve(text: &str, context: &VariableContext) -> String {
        Self::substitute(&Self::resolve_env_vars(text), context)
    }

    /// 文本中仍未替换的 `{{variable}}` 名称
    pub fn unresolved(text: &str) -> Vec<String> {
        var_regex()
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute() {
        let mut ctx = VariableContext::new();
        ctx.insert("host", "example.com");
        ctx.insert("port", "8080");

        assert_eq!(
            VariableResolver::substitute("https://{{host}}:{{ port }}/users", &ctx),
            "https://example.com:8080/users"
        );
    }

    #[test]
    fn test_substitute_missing_variable() {
        let ctx = VariableContext::new();
        assert_eq!(
            VariableResolver::substitute("{{missing}}/path", &ctx),
            "{{missing}}/path"
        );
    }

    #[test]
    fn test_resolve_env_vars_missing() {
        assert_eq!(
            VariableResolver::resolve_env_vars("Value: ${APIREQUESTS_NONEXISTENT_VAR}"),
            "Value: ${APIREQUESTS_NONEXISTENT_VAR}"
        );
    }

    #[test]
    fn test_resolve_combined() {
        unsafe {
            std::env::set_var("APIREQUESTS_TEST_KEY", "secret-key");
        }

        let mut ctx = VariableContext::new();
        ctx.insert("host", "api.example.com");

        assert_eq!(
            VariableResolver::resolve("https://{{host}}/auth?key=${APIREQUESTS_TEST_KEY}", &ctx),
            "https://api.example.com/auth?key=secret-key"
        );

        unsafe {
            std::env::remove_var("APIREQUESTS_TEST_KEY");
        }
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(
            VariableResolver::unresolved("{{a}}/x/{{ b }}"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(VariableResolver::unresolved("http://x.com").is_empty());
    }
}
