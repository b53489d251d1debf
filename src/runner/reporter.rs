use colored::Colorize;

use crate::report::{describe, finish_line, tally_line};
use crate::runner::types::{RunResults, TestResult, TestSummary};
use crate::task::SkippedRule;

/// 控制台报告
pub struct TestReporter {
    only_failures: bool,
}

impl TestReporter {
    pub fn new(only_failures: bool) -> Self {
        Self { only_failures }
    }

    /// 打印测试开始
    pub fn print_header(&self, source: &str, rules: usize, tasks: usize) {
        println!(
            "\nFind {} rules in {} and start with {} tasks\n",
            rules,
            source.bold(),
            tasks
        );
    }

    /// 打印被丢弃的规则
    pub fn print_skipped(&self, skipped: &[SkippedRule]) {
        for rule in skipped {
            println!("{} - {} {}", "* SKIP".yellow(), rule.method, rule.uri);
        }
    }

    /// 打印单个测试结果
    pub fn print_result(&self, result: &TestResult) {
        if result.failed() {
            println!("{} {}  - {}", "✖".red(), "FAIL".red(), describe(result));
            for msg in &result.output.msg {
                println!("\t- {}", msg.trim());
            }
            return;
        }

        if self.only_failures {
            return;
        }

        if result.is_probe() {
            println!("{} {}  - {}", "ℹ".blue(), "RUN".blue(), describe(result));
        } else {
            println!("{} {}  - {}", "✔".green(), "PASS".green(), describe(result));
        }
    }

    /// 打印一轮结果与摘要
    pub fn print_results(&self, results: &RunResults, summary: &TestSummary, elapsed_ms: i64) {
        for result in &results.single {
            self.print_result(result);
        }

        for group in &results.group {
            println!("\n{}", group.name.bold());
            for result in &group.tasks {
                self.print_result(result);
            }
        }

        println!("\n{}", finish_line(summary.total, elapsed_ms));
        let tally = tally_line(summary.passed, summary.failed);
        if summary.failed > 0 {
            println!("{} {}\n", "✖".red(), tally.red());
        } else {
            println!("{} {}\n", "✔".green(), tally.green());
        }
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
