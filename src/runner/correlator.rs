use chrono::{DateTime, Utc};

use crate::http::Response;
use crate::runner::types::{Pair, TaskRun};

/// 按任务顺序把结果与任务关联起来
///
/// 找不到对应结果的任务、以及多余的结果都会被丢弃。
/// 匹配成功时在结果上写入 `request_time`。
pub fn fill_results(tasks: &[TaskRun], results: Vec<Response>) -> Vec<Pair> {
    let mut pending = results;
    let mut pairs = Vec::with_capacity(tasks.len());

    for run in tasks {
        let Some(position) = pending.iter().position(|r| &r.num == run.num()) else {
            continue;
        };

        let mut result = pending.swap_remove(position);
        result.request_time = Some(elapsed_millis(run.reqstart, result.reqend));
        pairs.push(Pair {
            task: run.clone(),
            result,
        });
    }

    pairs
}

/// 四舍五入到毫秒
fn elapsed_millis(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let elapsed = end - start;
    match elapsed.num_microseconds() {
        Some(micros) => (micros as f64 / 1000.0).round() as i64,
        None => elapsed.num_milliseconds(),
    }
}
