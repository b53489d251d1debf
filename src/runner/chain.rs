use tracing::debug;

use crate::Result;
use crate::assertion::extractor::extract_key;
use crate::http::{Requester, Response};
use crate::runner::executor::TaskExecutor;
use crate::runner::types::TaskRun;
use crate::task::Group;

/// 一个分组的执行记录，顺序与组内任务一致
#[derive(Debug, Default)]
pub struct GroupRun {
    pub runs: Vec<TaskRun>,
    pub results: Vec<Response>,
}

/// 把链式取值拼到地址末尾
///
/// 地址已以该值结尾时原样返回，所以同一集合重复执行不会重复拼接。
pub fn chain_uri(uri: &str, value: &str) -> String {
    if uri.ends_with(value) {
        uri.to_string()
    } else if uri.ends_with('/') {
        format!("{}{}", uri, value)
    } else {
        format!("{}/{}", uri, value)
    }
}

/// 串行执行组内任务
///
/// 每一步都尝试从 body 中提取 `key`，取到的值覆盖之前的值，
/// 并写入下一个任务本次执行的副本。
pub async fn run_group<R: Requester>(executor: &TaskExecutor<R>, group: &Group) -> Result<GroupRun> {
    let mut group_run = GroupRun::default();
    let mut chained: Option<String> = None;

    for task in &group.tasks {
        let mut task = task.clone();
        if let Some(value) = chained.as_deref() {
            task.uri = chain_uri(&task.uri, value);
        }

        let (run, response) = executor.dispatch(task).await?;

        if let Some(key) = group.key.as_deref() {
            match extract_key(&response.body, key) {
                Ok(Some(value)) => chained = Some(value),
                Ok(None) => debug!(num = %run.num(), key, "no chain value"),
                Err(e) => debug!(num = %run.num(), error = %e, "body is not json"),
            }
        }

        group_run.runs.push(run);
        group_run.results.push(response);
    }

    Ok(group_run)
}
