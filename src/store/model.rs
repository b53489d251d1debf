use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::assertion::Output;
use crate::runner::TestResult;
use crate::store::serialization;

/// 存储的单个任务结果，每行一条 JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    /// 唯一 ID (UUID)
    pub id: String,

    /// 同一轮执行的结果共享一个 run_id
    pub run_id: String,

    pub timestamp: DateTime<Utc>,

    /// 所属分组
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    pub num: String,
    pub method: String,
    pub uri: String,

    /// 请求耗时 (毫秒)
    pub request_time: i64,

    pub status: u16,

    #[serde(with = "serialization::header_map")]
    pub headers: HeaderMap,

    /// 没有期望响应的任务
    pub probe: bool,

    pub output: Output,
}

impl StoredResult {
    pub fn from_result(
        result: &TestResult,
        run_id: &str,
        group: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let task = &result.task.task;
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            run_id: run_id.to_string(),
            timestamp,
            group: group.map(str::to_string),
            num: task.num.to_string(),
            method: task.method.to_string(),
            uri: task.uri.clone(),
            request_time: result.request_time(),
            status: result.result.status_code,
            headers: result.result.headers.clone(),
            probe: result.is_probe(),
            output: result.output.clone(),
        }
    }

    pub fn failed(&self) -> bool {
        !self.probe && !self.output.pass
    }
}
