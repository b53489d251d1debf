use chrono::{DateTime, Utc};

use crate::assertion::{Output, evaluate};
use crate::http::Response;
use crate::task::{Task, TaskId};

/// 一次执行中的任务：任务定义的副本加上开始时间
///
/// 链式调用改写的地址只写在这里，不会影响任务集合本身。
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRun {
    pub task: Task,
    pub reqstart: DateTime<Utc>,
}

impl TaskRun {
    /// 以当前时刻作为开始时间
    pub fn start(task: Task) -> Self {
        Self::at(task, Utc::now())
    }

    pub fn at(task: Task, reqstart: DateTime<Utc>) -> Self {
        Self { task, reqstart }
    }

    pub fn num(&self) -> &TaskId {
        &self.task.num
    }
}

/// 按 `num` 关联好的任务与结果
#[derive(Debug, Clone)]
pub struct Pair {
    pub task: TaskRun,
    pub result: Response,
}

/// 单个任务的最终结果
#[derive(Debug, Clone)]
pub struct TestResult {
    pub task: TaskRun,
    pub result: Response,
    pub output: Output,
}

impl TestResult {
    pub fn evaluate(pair: Pair) -> Self {
        let output = evaluate(&pair);
        Self {
            task: pair.task,
            result: pair.result,
            output,
        }
    }

    /// 没有期望的任务，报告为 RUN
    pub fn is_probe(&self) -> bool {
        self.task.task.is_probe()
    }

    pub fn failed(&self) -> bool {
        !self.is_probe() && !self.output.pass
    }

    pub fn request_time(&self) -> i64 {
        self.result.request_time.unwrap_or_default()
    }
}

/// 一个分组的结果
#[derive(Debug, Clone)]
pub struct GroupResult {
    pub name: String,
    pub tasks: Vec<TestResult>,
}

/// 一轮执行的全部结果
#[derive(Debug, Clone, Default)]
pub struct RunResults {
    pub single: Vec<TestResult>,
    pub group: Vec<GroupResult>,
}

impl RunResults {
    /// 依次遍历单任务与组内任务
    pub fn iter(&self) -> impl Iterator<Item = &TestResult> {
        self.single
            .iter()
            .chain(self.group.iter().flat_map(|g| g.tasks.iter()))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 测试摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub probes: usize,
}

impl TestSummary {
    pub fn from_results(results: &RunResults) -> Self {
        let total = results.len();
        let probes = results.iter().filter(|r| r.is_probe()).count();
        let failed = results.iter().filter(|r| r.failed()).count();

        Self {
            total,
            passed: total - probes - failed,
            failed,
            probes,
        }
    }

    /// 存在失败断言时为 1
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 { 1 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::ResponseExpectation;
    use crate::http::{Method, RequestInfo};
    use reqwest::header::HeaderMap;

    fn result(num: usize, expectation: Option<ResponseExpectation>, status: u16) -> TestResult {
        let mut task = Task::new(TaskId::Single(num), Method::Get, "http://example.com");
        task.response = expectation;

        let response = Response::new(
            TaskId::Single(num),
            status,
            HeaderMap::new(),
            "",
            RequestInfo {
                host: Some("example.com".to_string()),
                method: Method::Get,
                uri: "http://example.com".to_string(),
            },
        );

        TestResult::evaluate(Pair {
            task: TaskRun::start(task),
            result: response,
        })
    }

    #[test]
    fn test_summary_counts() {
        let expect_ok = Some(ResponseExpectation::default().with_statuscode(200));
        let results = RunResults {
            single: vec![
                result(1, expect_ok.clone(), 200),
                result(2, expect_ok.clone(), 500),
                result(3, None, 500),
            ],
            group: vec![GroupResult {
                name: "g1".to_string(),
                tasks: vec![result(4, expect_ok, 404)],
            }],
        };

        let summary = TestSummary::from_results(&results);
        assert_eq!(
            summary,
            TestSummary {
                total: 4,
                passed: 1,
                failed: 2,
                probes: 1,
            }
        );
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_summary_empty_run() {
        let summary = TestSummary::from_results(&RunResults::default());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_probe_never_fails() {
        let probe = result(1, None, 500);
        assert!(probe.is_probe());
        assert!(!probe.failed());
        assert!(probe.output.pass);
    }
}
