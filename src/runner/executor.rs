use std::time::Duration;

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::time::sleep;
use tracing::debug;

use crate::Result;
use crate::http::{Requester, Response};
use crate::runner::types::TaskRun;
use crate::task::Task;

/// 单任务执行器
///
/// 所有单任务并发发出；配置了 `max_in_flight` 时最多同时发出这么多个。
pub struct TaskExecutor<R> {
    requester: R,
    max_in_flight: Option<usize>,
}

/// 一批任务的执行记录，`results` 按完成顺序排列
#[derive(Debug, Default)]
pub struct Dispatched {
    pub runs: Vec<TaskRun>,
    pub results: Vec<Response>,
}

impl<R: Requester> TaskExecutor<R> {
    pub fn new(requester: R) -> Self {
        Self {
            requester,
            max_in_flight: None,
        }
    }

    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit.filter(|n| *n > 0);
        self
    }

    /// 发送一个任务，开始时间在发送前一刻记录
    pub async fn dispatch(&self, task: Task) -> Result<(TaskRun, Response)> {
        let run = TaskRun::start(task);
        let response = self.requester.execute(&run.task).await?;
        Ok((run, response))
    }

    /// 先等待任务自己的 delay，再发送
    pub async fn call(&self, task: Task) -> Result<(TaskRun, Response)> {
        if let Some(delay) = task.delay.filter(|d| *d > 0) {
            debug!(num = %task.num, delay, "delaying request");
            sleep(Duration::from_millis(delay)).await;
        }
        self.dispatch(task).await
    }

    /// 并发执行全部单任务，任意一个传输失败则整批失败
    pub async fn execute_all(&self, tasks: &[Task]) -> Result<Dispatched> {
        let calls = tasks.iter().cloned().map(|task| self.call(task));

        let completed: Vec<(TaskRun, Response)> = match self.max_in_flight {
            Some(limit) => stream::iter(calls).buffer_unordered(limit).try_collect().await?,
            None => try_join_all(calls).await?,
        };

        let (mut runs, results): (Vec<_>, Vec<_>) = completed.into_iter().unzip();
        // 任务记录保持原始顺序，结果顺序交给关联阶段处理
        runs.sort_by_key(|run| {
            tasks
                .iter()
                .position(|t| t.num == run.task.num)
                .unwrap_or(usize::MAX)
        });

        Ok(Dispatched { runs, results })
    }
}
