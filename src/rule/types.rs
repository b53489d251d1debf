use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::assertion::ResponseExpectation;
use crate::assertion::extractor::value_to_string;
use crate::rule::serialization;
use crate::variable::{VariableContext, VariableResolver};

/// 用户编写的一条规则，未经校验
///
/// 带 `group` 的规则是分组，组内每个元素又是一条规则。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    #[serde(
        default,
        deserialize_with = "serialization::millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseExpectation>,

    #[serde(
        default,
        deserialize_with = "serialization::lenient_rules",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<Vec<Rule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 分组的链式取值字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// 格式错误的原因，构建任务时整条规则被丢弃
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl Rule {
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn group(rules: Vec<Rule>) -> Self {
        Self {
            group: Some(rules),
            ..Default::default()
        }
    }

    /// 从 JSON 值解析一条规则，字段类型不对时得到一条待丢弃的规则
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(rule) => rule,
            Err(e) => Self::malformed(&value, e.to_string()),
        }
    }

    fn malformed(value: &Value, reason: String) -> Self {
        let text = |field: &str| value.get(field).map(value_to_string);
        Self {
            method: text("method"),
            uri: text("uri"),
            // 分组仍占一个分组序号
            group: value
                .get("group")
                .and_then(Value::as_array)
                .map(|members| members.iter().cloned().map(Rule::from_value).collect()),
            malformed: Some(reason),
            ..Default::default()
        }
    }

    /// 替换 uri、字符串类型的 header 值和 body 中的 `{{var}}` / `${ENV}`
    pub fn resolve_variables(&mut self, context: &VariableContext) {
        if let Some(uri) = &mut self.uri {
            *uri = VariableResolver::resolve(uri, context);
            for name in VariableResolver::unresolved(uri) {
                warn!(variable = %name, uri = %uri, "undefined variable");
            }
        }

        if let Some(headers) = &mut self.headers {
            for value in headers.values_mut() {
                if let Value::String(text) = value {
                    *text = VariableResolver::resolve(text, context);
                }
            }
        }

        if let Some(Value::String(text)) = &mut self.body {
            *text = VariableResolver::resolve(text, context);
        }

        if let Some(group) = &mut self.group {
            for rule in group {
                rule.resolve_variables(context);
            }
        }
    }
}
