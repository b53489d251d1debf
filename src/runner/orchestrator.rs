use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::Result;
use crate::http::Requester;
use crate::runner::chain::run_group;
use crate::runner::correlator::fill_results;
use crate::runner::executor::TaskExecutor;
use crate::runner::types::{GroupResult, RunResults, TestResult};
use crate::task::TaskCollection;

/// 循环参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopOptions {
    /// 两轮之间的间隔，None 表示只跑一轮
    pub interval: Option<Duration>,
    /// 最多跑几轮，None 表示直到进程结束
    pub max_runs: Option<usize>,
}

impl LoopOptions {
    pub fn once() -> Self {
        Self::default()
    }

    pub fn every(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
            max_runs: None,
        }
    }

    pub fn with_max_runs(mut self, max_runs: Option<usize>) -> Self {
        self.max_runs = max_runs;
        self
    }

    pub fn is_looping(&self) -> bool {
        self.interval.is_some()
    }
}

/// 执行编排：单任务与分组并发执行，关联结果并比较
pub struct Runner<R> {
    executor: TaskExecutor<R>,
}

impl<R: Requester> Runner<R> {
    pub fn new(requester: R) -> Self {
        Self {
            executor: TaskExecutor::new(requester),
        }
    }

    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.executor = self.executor.with_max_in_flight(limit);
        self
    }

    /// 执行一轮
    ///
    /// 任意一个请求传输失败，整轮失败。
    pub async fn run_once(&self, collection: &TaskCollection) -> Result<RunResults> {
        let singles = self.executor.execute_all(&collection.singles);
        let groups = try_join_all(
            collection
                .groups
                .iter()
                .map(|group| run_group(&self.executor, group)),
        );

        let (dispatched, group_runs) = tokio::try_join!(singles, groups)?;

        let single = fill_results(&dispatched.runs, dispatched.results)
            .into_iter()
            .map(TestResult::evaluate)
            .collect();

        let group = collection
            .groups
            .iter()
            .zip(group_runs)
            .map(|(group, run)| GroupResult {
                name: group.label(),
                tasks: fill_results(&run.runs, run.results)
                    .into_iter()
                    .map(TestResult::evaluate)
                    .collect(),
            })
            .collect();

        Ok(RunResults { single, group })
    }

    /// 执行任务集合，每轮结束后把结果与开始时间交给 `on_report`
    ///
    /// 循环模式下某一轮失败只记录日志，继续下一轮。返回实际执行的轮数。
    pub async fn run<F>(
        &self,
        collection: &TaskCollection,
        options: LoopOptions,
        mut on_report: F,
    ) -> Result<usize>
    where
        F: FnMut(&RunResults, DateTime<Utc>) -> Result<()>,
    {
        let mut runs = 0;

        loop {
            runs += 1;
            let started_at = Utc::now();

            match self.run_once(collection).await {
                Ok(results) => on_report(&results, started_at)?,
                Err(e) if options.is_looping() => {
                    warn!(run = runs, error = %e, "run failed, waiting for next one");
                }
                Err(e) => return Err(e),
            }

            let Some(interval) = options.interval else {
                break;
            };
            if options.max_runs.is_some_and(|max| runs >= max) {
                break;
            }

            sleep(interval).await;
            info!(
                "Start again with {} tasks, made {} runs",
                collection.len(),
                runs
            );
        }

        Ok(runs)
    }
}
