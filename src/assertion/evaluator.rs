use jsonschema::JSONSchema;
use regex::Regex;
use serde_json::Value;

use crate::assertion::extractor::{
    MISSING, body_to_string, header_value, parse_body, value_to_string,
};
use crate::assertion::types::{BodyMode, Output, ResponseExpectation};
use crate::http::Response;
use crate::runner::types::Pair;

/// 单条检查：不满足时返回一条诊断信息
type Check = fn(&ResponseExpectation, &Response) -> Option<String>;

/// 检查顺序决定 `msg` 中信息的顺序
const CHECKS: &[Check] = &[
    check_statuscode,
    check_host,
    check_time,
    check_content_type,
    check_content_length,
    check_server,
    check_cache_control,
    check_data,
];

/// 比较一对任务与结果
pub fn evaluate(pair: &Pair) -> Output {
    match &pair.task.task.response {
        Some(expectation) => compare(expectation, &pair.result),
        None => Output::unchecked(),
    }
}

/// 按检查表逐项比较期望与实际响应
pub fn compare(expectation: &ResponseExpectation, response: &Response) -> Output {
    let msg = CHECKS
        .iter()
        .filter_map(|check| check(expectation, response))
        .collect();

    Output::from_messages(msg)
}

fn not_equal(expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> String {
    format!("{} is not equal {}", expected, actual)
}

/// 严格相等：头和文本 body 都是字符串，非字符串的期望永远不相等
fn strictly_equals(expected: &Value, actual: &str) -> bool {
    matches!(expected, Value::String(text) if text == actual)
}

fn check_statuscode(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let expected = expectation.statuscode?;
    (expected != response.status_code).then(|| not_equal(expected, response.status_code))
}

fn check_host(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let expected = expectation.host.as_deref()?;
    let actual = response.request.host.as_deref().unwrap_or(MISSING);
    (expected != actual).then(|| not_equal(expected, actual))
}

fn check_time(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let budget = expectation.time?;
    let actual = response.request_time?;
    (actual > budget as i64).then(|| format!("{} greater than {}", actual, budget))
}

fn check_header(expected: Option<&Value>, response: &Response, name: &str) -> Option<String> {
    let expected = expected?;
    match header_value(response, name) {
        Some(actual) if strictly_equals(expected, actual) => None,
        actual => Some(not_equal(
            value_to_string(expected),
            actual.unwrap_or(MISSING),
        )),
    }
}

fn check_content_type(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let headers = expectation.headers.as_ref()?;
    check_header(headers.contenttype.as_ref(), response, "content-type")
}

fn check_content_length(
    expectation: &ResponseExpectation,
    response: &Response,
) -> Option<String> {
    let headers = expectation.headers.as_ref()?;
    check_header(headers.contentlength.as_ref(), response, "content-length")
}

fn check_server(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let headers = expectation.headers.as_ref()?;
    check_header(headers.server.as_ref(), response, "server")
}

fn check_cache_control(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let headers = expectation.headers.as_ref()?;
    check_header(headers.cachecontrol.as_ref(), response, "cache-control")
}

fn check_data(expectation: &ResponseExpectation, response: &Response) -> Option<String> {
    let data = expectation.data.as_ref()?;
    match expectation.body_mode() {
        BodyMode::Regex => check_pattern(data, response),
        BodyMode::Schema => check_schema(data, response),
        BodyMode::Literal => check_literal(data, response),
    }
}

fn check_pattern(data: &Value, response: &Response) -> Option<String> {
    let pattern = value_to_string(data);
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return Some(format!("{} is not a valid pattern", pattern)),
    };

    let body = body_to_string(&response.body);
    (!re.is_match(&body)).then(|| format!("{} not includes {}", body, pattern))
}

fn check_schema(data: &Value, response: &Response) -> Option<String> {
    let Ok(instance) = parse_body(&response.body) else {
        return Some("parse error".to_string());
    };

    let schema = match JSONSchema::compile(data) {
        Ok(schema) => schema,
        Err(e) => return Some(e.to_string()),
    };

    // 只保留第一条违规信息
    match schema.validate(&instance) {
        Ok(()) => None,
        Err(mut errors) => errors.next().map(|e| e.to_string()),
    }
}

fn check_literal(data: &Value, response: &Response) -> Option<String> {
    let actual = body_to_string(&response.body);
    let (expected, equal) = match data {
        Value::Object(_) | Value::Array(_) => match serde_json::to_string(data) {
            Ok(json) => {
                let equal = json == actual;
                (json, equal)
            }
            Err(_) => return Some("result body isn't right json".to_string()),
        },
        primitive => (value_to_string(primitive), strictly_equals(primitive, &actual)),
    };

    (!equal).then(|| not_equal(&expected, &actual))
}
