use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use crate::assertion::extractor::value_to_string;
use crate::http::response::{RequestInfo, Response};
use crate::task::Task;
use crate::{ApiRequestsError, Result};

/// 发送单个任务的能力
///
/// 编排层只依赖这个 trait，测试中可以替换为不走网络的实现。
#[async_trait]
pub trait Requester: Send + Sync {
    async fn execute(&self, task: &Task) -> Result<Response>;
}

#[async_trait]
impl<R: Requester + ?Sized> Requester for std::sync::Arc<R> {
    async fn execute(&self, task: &Task) -> Result<Response> {
        (**self).execute(task).await
    }
}

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    /// 默认不设置超时
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
        })
    }

    fn build_request(&self, task: &Task, url: reqwest::Url) -> Result<reqwest::RequestBuilder> {
        let mut req = self.inner.request(task.method.to_reqwest(), url);
        let mut has_content_type = false;

        if let Some(headers) = &task.headers {
            for (name, value) in headers {
                if name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                    has_content_type = true;
                }
                req = req.header(name.as_str(), value.as_str());
            }
        }

        // form 优先于 body
        if let Some(form) = &task.form {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in form {
                serializer.append_pair(key, &value_to_string(value));
            }
            if !has_content_type {
                req = req.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            req = req.body(serializer.finish());
        } else if let Some(body) = &task.body {
            match body {
                Value::String(text) => {
                    req = req.body(text.clone());
                }
                other => {
                    if !has_content_type {
                        req = req.header(CONTENT_TYPE, "application/json");
                    }
                    req = req.body(serde_json::to_string(other)?);
                }
            }
        }

        Ok(req)
    }
}

#[async_trait]
impl Requester for Client {
    async fn execute(&self, task: &Task) -> Result<Response> {
        let url = reqwest::Url::parse(&task.uri)?;
        let request = RequestInfo {
            host: url.host_str().map(str::to_string),
            method: task.method,
            uri: task.uri.clone(),
        };
        let req = self.build_request(task, url)?;

        let num = task.num.to_string();
        debug!(num = %num, method = %task.method, uri = %task.uri, "sending request");

        let response = req
            .send()
            .await
            .map_err(|source| ApiRequestsError::Transport {
                num: num.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|source| ApiRequestsError::Transport {
                num: num.clone(),
                source,
            })?;
        let reqend = Utc::now();

        debug!(num = %num, status, "response received");

        Ok(Response::new(task.num.clone(), status, headers, body, request).with_reqend(reqend))
    }
}
