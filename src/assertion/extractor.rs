use crate::http::{Response, ResponseBody};
use serde_json::Value;

/// 缺失值在诊断信息中的写法
pub const MISSING: &str = "undefined";

/// JSON 值的展示形式：字符串不带引号，其余按 JSON 渲染
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Body 的字符串形式
///
/// 文本原样返回；未经序列化的结构化值不会被重新 stringify，
/// 对象渲染为 `[object Object]`，数组按元素逗号拼接。
pub fn body_to_string(body: &ResponseBody) -> String {
    match body {
        ResponseBody::Text(text) => text.clone(),
        ResponseBody::Structured(value) => coerce_value(value),
    }
}

fn coerce_value(value: &Value) -> String {
    match value {
        Value::Object(_) => "[object Object]".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => value_to_string(other),
    }
}

/// 将 body 解析为 JSON；已是结构化值时直接返回
pub fn parse_body(body: &ResponseBody) -> Result<Value, serde_json::Error> {
    match body {
        ResponseBody::Text(text) => serde_json::from_str(text),
        ResponseBody::Structured(value) => Ok(value.clone()),
    }
}

/// 取响应头的值，头不存在或不是合法 UTF-8 时返回 None
pub fn header_value<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
}

/// 从 body 中提取链式取值的字段
///
/// 解析失败返回错误；字段不存在或为 null 返回 `Ok(None)`。
pub fn extract_key(body: &ResponseBody, key: &str) -> Result<Option<String>, serde_json::Error> {
    let parsed = parse_body(body)?;
    Ok(parsed
        .get(key)
        .filter(|value| !value.is_null())
        .map(value_to_string))
}
