use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tokio::time::{Instant, sleep};

use crate::http::{RequestInfo, Requester, Response, ResponseBody};
use crate::task::Task;
use crate::{ApiRequestsError, Result};

/// 不走网络的 Requester，未登记的地址返回 404
#[derive(Default)]
pub(crate) struct FakeRequester {
    routes: HashMap<String, (u16, ResponseBody)>,
    failing: HashSet<String>,
    latency: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    starts: Mutex<Vec<(String, Instant)>>,
}

impl FakeRequester {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, uri: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(uri.to_string(), (status, ResponseBody::from(body)));
        self
    }

    pub(crate) fn respond_value(mut self, uri: &str, body: Value) -> Self {
        self.routes
            .insert(uri.to_string(), (200, ResponseBody::Structured(body)));
        self
    }

    pub(crate) fn fail(mut self, uri: &str) -> Self {
        self.failing.insert(uri.to_string());
        self
    }

    /// 该地址的请求要过 `millis` 毫秒才返回
    pub(crate) fn slow(mut self, uri: &str, millis: u64) -> Self {
        self.latency
            .insert(uri.to_string(), Duration::from_millis(millis));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// 每个请求开始的时刻，按开始顺序
    pub(crate) fn starts(&self) -> Vec<(String, Instant)> {
        self.starts.lock().unwrap().clone()
    }

    pub(crate) fn started_at(&self, uri: &str) -> Option<Instant> {
        self.starts()
            .into_iter()
            .find(|(called, _)| called == uri)
            .map(|(_, at)| at)
    }
}

#[async_trait]
impl Requester for FakeRequester {
    async fn execute(&self, task: &Task) -> Result<Response> {
        self.calls.lock().unwrap().push(task.uri.clone());
        self.starts
            .lock()
            .unwrap()
            .push((task.uri.clone(), Instant::now()));

        if let Some(latency) = self.latency.get(&task.uri) {
            sleep(*latency).await;
        }

        if self.failing.contains(&task.uri) {
            return Err(ApiRequestsError::Other(format!(
                "connection refused: {}",
                task.uri
            )));
        }

        let (status, body) = self
            .routes
            .get(&task.uri)
            .cloned()
            .unwrap_or((404, ResponseBody::from("not found")));

        let host = url::Url::parse(&task.uri)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));

        Ok(Response::new(
            task.num.clone(),
            status,
            HeaderMap::new(),
            body,
            RequestInfo {
                host,
                method: task.method,
                uri: task.uri.clone(),
            },
        ))
    }
}
