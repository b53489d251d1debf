use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap as Headers;
use serde_json::Value;

use crate::http::types::Method;
use crate::task::TaskId;

/// 响应体
///
/// HTTP 返回的永远是文本；`Structured` 用于进程内构造、未经序列化的值。
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Structured(Value),
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::Text(text.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Text(text)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Structured(value)
    }
}

/// 实际发出的请求
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInfo {
    pub host: Option<String>,
    pub method: Method,
    pub uri: String,
}

#[derive(Debug, Clone)]
pub struct Response {
    /// 与任务相同的关联标识
    pub num: TaskId,
    pub status_code: u16,
    pub headers: Headers,
    pub body: ResponseBody,
    pub request: RequestInfo,
    /// body 完整接收的时刻
    pub reqend: DateTime<Utc>,
    /// 关联后写入，毫秒
    pub request_time: Option<i64>,
}

impl Response {
    pub fn new(
        num: TaskId,
        status_code: u16,
        headers: Headers,
        body: impl Into<ResponseBody>,
        request: RequestInfo,
    ) -> Self {
        Self {
            num,
            status_code,
            headers,
            body: body.into(),
            request,
            reqend: Utc::now(),
            request_time: None,
        }
    }

    pub fn with_reqend(mut self, reqend: DateTime<Utc>) -> Self {
        self.reqend = reqend;
        self
    }
}
