use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 任务的期望响应
///
/// 每个存在的字段激活一条比较规则，缺失字段不做检查。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResponseExpectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuscode: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// 耗时上限（毫秒）
    #[serde(
        default,
        deserialize_with = "crate::rule::serialization::millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HeaderExpectations>,

    /// 期望的 body：字面值、正则或 JSON Schema，取决于 `regex` / `schema`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub regex: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub schema: bool,
}

impl ResponseExpectation {
    pub fn with_statuscode(mut self, code: u16) -> Self {
        self.statuscode = Some(code);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_time(mut self, millis: u64) -> Self {
        self.time = Some(millis);
        self
    }

    pub fn with_headers(mut self, headers: HeaderExpectations) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_regex(mut self) -> Self {
        self.regex = true;
        self
    }

    pub fn with_schema(mut self) -> Self {
        self.schema = true;
        self
    }

    /// Body 比较模式，优先级：regex > schema > 字面值
    pub fn body_mode(&self) -> BodyMode {
        if self.regex {
            BodyMode::Regex
        } else if self.schema {
            BodyMode::Schema
        } else {
            BodyMode::Literal
        }
    }
}

/// 响应头期望，字段名对应小写的 HTTP 头
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HeaderExpectations {
    /// `content-type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contenttype: Option<Value>,

    /// `content-length`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contentlength: Option<Value>,

    /// `server`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Value>,

    /// `cache-control`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cachecontrol: Option<Value>,
}

/// Body 比较模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    Regex,
    Schema,
    Literal,
}

/// 比较结论
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Output {
    pub msg: Vec<String>,
    pub pass: bool,
}

impl Output {
    /// 没有期望时的结论：直接通过
    pub fn unchecked() -> Self {
        Self {
            msg: Vec::new(),
            pass: true,
        }
    }

    pub fn from_messages(msg: Vec<String>) -> Self {
        let pass = msg.is_empty();
        Self { msg, pass }
    }
}
