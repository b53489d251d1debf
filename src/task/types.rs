use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::assertion::ResponseExpectation;
use crate::http::Method;

/// 关联标识：单任务为整数，分组任务为 `g<组>-<位置>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskId {
    Single(usize),
    Grouped { group: usize, index: usize },
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Single(n) => write!(f, "{}", n),
            TaskId::Grouped { group, index } => write!(f, "g{}-{}", group, index),
        }
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaskId::Single(n) => serializer.serialize_u64(*n as u64),
            grouped => serializer.collect_str(grouped),
        }
    }
}

/// 通过校验、可以直接执行的请求
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub num: TaskId,
    pub method: Method,
    pub uri: String,
    pub name: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub form: Option<BTreeMap<String, Value>>,
    pub body: Option<Value>,
    /// 发送前等待的毫秒数，只对单任务生效
    pub delay: Option<u64>,
    pub response: Option<ResponseExpectation>,
}

impl Task {
    pub fn new(num: TaskId, method: Method, uri: impl Into<String>) -> Self {
        Self {
            num,
            method,
            uri: uri.into(),
            name: None,
            headers: None,
            form: None,
            body: None,
            delay: None,
            response: None,
        }
    }

    pub fn with_response(mut self, response: ResponseExpectation) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 没有期望响应的任务只探测，不做比较
    pub fn is_probe(&self) -> bool {
        self.response.is_none()
    }
}

/// 串行执行并链式传值的任务组
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// 1-based 组序号
    pub num: usize,
    pub name: Option<String>,
    /// 从响应 body 中提取并拼接到下一个地址的字段名
    pub key: Option<String>,
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn new(num: usize) -> Self {
        Self {
            num,
            name: None,
            key: None,
            tasks: Vec::new(),
        }
    }

    /// 报告中使用的组名，未命名时为 `g<N>`
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("g{}", self.num))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCollection {
    pub singles: Vec<Task>,
    pub groups: Vec<Group>,
}

impl TaskCollection {
    /// 所有任务数（含组内任务）
    pub fn len(&self) -> usize {
        self.singles.len() + self.groups.iter().map(|g| g.tasks.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
