/// 报告模块 - 按输出模式分发一轮的结果
pub mod html;
pub mod junit;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Result;
use crate::runner::{RunResults, TestReporter, TestResult, TestSummary};
use crate::store::ResultStore;
use crate::variable::RunSettings;

pub const DEFAULT_HTML_FILE: &str = "reports.html";
pub const DEFAULT_XML_FILE: &str = "reports.xml";
pub const DEFAULT_CONNECTION: &str = ".apirequests";
pub const DEFAULT_COLLECTION: &str = "results";

/// 输出模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Print,
    Html,
    Xml,
    Store,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub output: OutputMode,
    /// 控制台只打印失败的任务
    pub only_failures: bool,
    /// 循环间隔，HTML 报告据此自动刷新
    pub refresh: Option<Duration>,
    pub output_path: PathBuf,
    /// 未指定时按模式取 `reports.html` / `reports.xml`
    pub output_file: Option<String>,
    /// 结果存储目录
    pub connection: PathBuf,
    pub collection: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output: OutputMode::Print,
            only_failures: false,
            refresh: None,
            output_path: PathBuf::from("./"),
            output_file: None,
            connection: PathBuf::from(DEFAULT_CONNECTION),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl ReportOptions {
    /// 由合并后的 `[run]` 配置得到，未设置的字段取默认值
    pub fn from_settings(settings: &RunSettings) -> Self {
        let defaults = Self::default();
        Self {
            output: settings.output.unwrap_or(defaults.output),
            only_failures: settings.only_failures.unwrap_or(defaults.only_failures),
            refresh: settings.loop_ms.map(Duration::from_millis),
            output_path: settings.output_path.clone().unwrap_or(defaults.output_path),
            output_file: settings.output_file.clone(),
            connection: settings.connection.clone().unwrap_or(defaults.connection),
            collection: settings.collection.clone().unwrap_or(defaults.collection),
        }
    }

    /// 报告文件路径
    pub fn report_file(&self) -> PathBuf {
        let default = match self.output {
            OutputMode::Xml => DEFAULT_XML_FILE,
            _ => DEFAULT_HTML_FILE,
        };
        self.output_path
            .join(self.output_file.as_deref().unwrap_or(default))
    }
}

pub struct Reporter {
    options: ReportOptions,
    console: TestReporter,
}

impl Reporter {
    pub fn new(options: ReportOptions) -> Self {
        let console = TestReporter::new(options.only_failures);
        Self { options, console }
    }

    /// 输出一轮结果，返回摘要
    pub fn report(&self, results: &RunResults, started_at: DateTime<Utc>) -> Result<TestSummary> {
        let elapsed_ms = (Utc::now() - started_at).num_milliseconds();
        let summary = TestSummary::from_results(results);

        match self.options.output {
            OutputMode::Print => self.console.print_results(results, &summary, elapsed_ms),
            OutputMode::Html => {
                let content = html::render_html(results, &summary, elapsed_ms, self.options.refresh);
                self.write_report(&content)?;
            }
            OutputMode::Xml => {
                let content = junit::render_junit_xml(results, &summary, elapsed_ms);
                self.write_report(&content)?;
            }
            OutputMode::Store => {
                let store = ResultStore::open(&self.options.connection, &self.options.collection)?;
                let saved = store.append_run(results)?;
                println!(
                    "{}",
                    format!("Saved {} results to {}", saved, store.path().display()).green()
                );
            }
        }

        Ok(summary)
    }

    fn write_report(&self, content: &str) -> Result<()> {
        let path = self.options.report_file();
        ensure_parent(&path)?;
        fs::write(&path, content)?;
        info!(path = %path.display(), "report written");
        println!(
            "{} {}",
            "✔".green(),
            format!("Report file {} saved!", path.display()).green()
        );
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// `Finish 3 tasks in 120 milliseconds.`
pub fn finish_line(total: usize, elapsed_ms: i64) -> String {
    let noun = if total == 1 { "task" } else { "tasks" };
    format!("Finish {} {} in {} milliseconds.", total, noun, elapsed_ms)
}

/// `Have passed 2 and failed 1 task.`
pub fn tally_line(passed: usize, failed: usize) -> String {
    let noun = if failed == 1 { "task" } else { "tasks" };
    format!("Have passed {} and failed {} {}.", passed, failed, noun)
}

/// `1 GET http://x in 12 milliseconds delayed with 100`
pub fn describe(result: &TestResult) -> String {
    let task = &result.task.task;
    let mut line = format!(
        "{} {} {} in {} milliseconds",
        task.num,
        task.method,
        task.uri,
        result.request_time()
    );
    if let Some(delay) = task.delay.filter(|d| *d > 0) {
        line.push_str(&format!(" delayed with {}", delay));
    }
    line
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::assertion::{Output, ResponseExpectation};
    use crate::http::{Method, RequestInfo, Response};
    use crate::runner::{GroupResult, RunResults, TaskRun, TestResult};
    use crate::task::{Task, TaskId};
    use reqwest::header::HeaderMap;

    pub(crate) fn result(num: TaskId, uri: &str, msg: Option<Vec<&str>>) -> TestResult {
        let mut task = Task::new(num.clone(), Method::Get, uri);
        let output = match msg {
            Some(msg) => {
                task.response = Some(ResponseExpectation::default());
                Output::from_messages(msg.into_iter().map(String::from).collect())
            }
            None => Output::unchecked(),
        };

        let mut response = Response::new(
            num,
            200,
            HeaderMap::new(),
            "",
            RequestInfo {
                host: None,
                method: Method::Get,
                uri: uri.to_string(),
            },
        );
        response.request_time = Some(12);

        TestResult {
            task: TaskRun::start(task),
            result: response,
            output,
        }
    }

    /// 一个通过、一个失败、一个探测，外加一个组
    pub(crate) fn mixed_results() -> RunResults {
        RunResults {
            single: vec![
                result(TaskId::Single(1), "http://a.com", Some(vec![])),
                result(
                    TaskId::Single(2),
                    "http://b.com?x=1&y=<2>",
                    Some(vec!["200 is not equal 500", "x is not equal y"]),
                ),
                result(TaskId::Single(3), "http://c.com", None),
            ],
            group: vec![GroupResult {
                name: "users".to_string(),
                tasks: vec![result(
                    TaskId::Grouped { group: 1, index: 1 },
                    "http://d.com",
                    Some(vec![]),
                )],
            }],
        }
    }
}
