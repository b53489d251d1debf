use std::time::Duration;

use crate::report::{describe, finish_line, tally_line};
use crate::runner::{RunResults, TestResult, TestSummary};

const INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;";

/// 渲染 HTML 报告，循环模式下带自动刷新
pub fn render_html(
    results: &RunResults,
    summary: &TestSummary,
    elapsed_ms: i64,
    refresh: Option<Duration>,
) -> String {
    let mut out = String::from("<html><head><meta charset=\"utf-8\"/>");
    if let Some(interval) = refresh {
        let seconds = (interval.as_millis() as f64 / 1000.0).round() as u64;
        out.push_str(&format!(
            r#"<meta http-equiv="refresh" content="{}">"#,
            seconds
        ));
    }
    out.push_str("<style>.error{color:red;}.pass{color:green;}</style></head><body>");
    out.push_str("<h1>apirequests report</h1>");

    for result in &results.single {
        push_entry(&mut out, result);
    }
    for group in &results.group {
        out.push_str(&format!("<h2>{}</h2>", html_escape(&group.name)));
        for result in &group.tasks {
            push_entry(&mut out, result);
        }
    }

    out.push_str(&format!(
        "<div>{}</div>",
        html_escape(&finish_line(summary.total, elapsed_ms))
    ));
    let class = if summary.failed > 0 { "error" } else { "pass" };
    out.push_str(&format!(
        r#"<div><span class="{}">{}</span></div>"#,
        class,
        tally_line(summary.passed, summary.failed)
    ));
    out.push_str("</body></html>");
    out
}

fn push_entry(out: &mut String, result: &TestResult) {
    let line = html_escape(&describe(result));
    if result.failed() {
        out.push_str(&format!(
            r#"<div><strong class="error">* FAIL</strong> - {}<br>"#,
            line
        ));
        for msg in &result.output.msg {
            out.push_str(&format!("{} - {}<br>", INDENT, html_escape(msg.trim())));
        }
        out.push_str("</div><br>");
    } else {
        let label = if result.is_probe() { "* RUN" } else { "* PASS" };
        out.push_str(&format!(
            r#"<div><span class="pass">{}</span> - {}<br><br></div>"#,
            label, line
        ));
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
