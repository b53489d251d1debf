use crate::runner::{RunResults, TestSummary};

/// 渲染 JUnit XML，每个任务一个 testcase
///
/// 有诊断信息的任务附带 `<error message>`，多条信息以 `, ` 拼接。
pub fn render_junit_xml(results: &RunResults, summary: &TestSummary, elapsed_ms: i64) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<testsuite name="apirequests" tests="{}" failures="{}" time="{}">"#,
        summary.total,
        summary.failed,
        seconds(elapsed_ms)
    ));
    out.push('\n');

    for result in results.iter() {
        let name = xml_escape(&result.task.task.uri);
        let time = seconds(result.request_time());
        if result.output.msg.is_empty() {
            out.push_str(&format!(
                r#"<testcase name="{}" time="{}"/>"#,
                name, time
            ));
        } else {
            out.push_str(&format!(r#"<testcase name="{}" time="{}">"#, name, time));
            out.push_str(&format!(
                r#"<error message="{}"/>"#,
                xml_escape(&result.output.msg.join(", "))
            ));
            out.push_str("</testcase>");
        }
        out.push('\n');
    }

    out.push_str("</testsuite>");
    out.push('\n');
    out
}

fn seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
