use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::rule::types::Rule;
use crate::{ApiRequestsError, Result};

/// 规则加载器，规则文件是一个 JSON 数组
pub struct RuleLoader;

impl RuleLoader {
    /// 从文件加载规则
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Rule>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ApiRequestsError::RulesNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let rules = Self::parse_content(&content)?;
        debug!(path = %path.display(), count = rules.len(), "rules loaded");

        Ok(rules)
    }

    /// 从字符串解析规则
    ///
    /// 空内容和 `null` 视为没有规则；空数组合法，会得到零个任务。
    /// 数组中的每条规则单独解析，格式错误的规则留给构建阶段丢弃。
    pub fn parse_content(content: &str) -> Result<Vec<Rule>> {
        if content.trim().is_empty() {
            return Err(ApiRequestsError::NoRules);
        }

        let values: Option<Vec<Value>> = serde_json::from_str(content)
            .map_err(|e| ApiRequestsError::ParseError(format!("规则文件格式错误: {}", e)))?;

        values
            .map(|values| values.into_iter().map(Rule::from_value).collect())
            .ok_or(ApiRequestsError::NoRules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_content() {
        let rules = RuleLoader::parse_content(
            r#"[{"uri": "http://www.google.com", "response": {}}, {"group": []}]"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].uri.as_deref(), Some("http://www.google.com"));
        assert_eq!(rules[1].group, Some(vec![]));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(RuleLoader::parse_content("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_no_rules() {
        assert!(matches!(
            RuleLoader::parse_content(""),
            Err(ApiRequestsError::NoRules)
        ));
        assert!(matches!(
            RuleLoader::parse_content("null"),
            Err(ApiRequestsError::NoRules)
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            RuleLoader::parse_content("{not json"),
            Err(ApiRequestsError::ParseError(_))
        ));
        assert!(matches!(
            RuleLoader::parse_content(r#"{"uri": "http://x.com"}"#),
            Err(ApiRequestsError::ParseError(_))
        ));
    }

    #[test]
    fn test_wrong_typed_rule_does_not_reject_file() {
        let rules = RuleLoader::parse_content(
            r#"[{"uri": "http://a.com"}, {"uri": 42}, {"delay": "100"}, {"response": {"time": 12.5}}]"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0].uri.as_deref(), Some("http://a.com"));
        assert!(rules[0].malformed.is_none());
        assert!(rules[1].malformed.is_some());
        assert_eq!(rules[2].delay, Some(100));
        assert_eq!(rules[3].response.as_ref().and_then(|r| r.time), Some(13));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"method": "put", "uri": "http://x.com"}]"#)
            .unwrap();
        file.flush().unwrap();

        let rules = RuleLoader::load_file(file.path()).unwrap();
        assert_eq!(rules[0].method.as_deref(), Some("put"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuleLoader::load_file("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.to_string(), "/definitely/not/here.json doesn't exist!");
    }
}
