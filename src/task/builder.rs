use tracing::{debug, warn};

use crate::assertion::extractor::value_to_string;
use crate::http::Method;
use crate::rule::Rule;
use crate::task::types::{Group, Task, TaskCollection, TaskId};
use crate::uri::is_valid_uri;

/// 被丢弃的规则，CLI 据此打印 `* SKIP` 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub num: String,
    pub method: String,
    pub uri: String,
    pub reason: String,
}

/// 把规则转换为任务集合
///
/// 单任务计数器对每条非分组规则递增（包括被丢弃的），
/// 组内任务按位置编号，丢弃不会影响后续任务的序号。
#[derive(Debug, Default)]
pub struct TaskBuilder {
    skipped: Vec<SkippedRule>,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self, rules: &[Rule]) -> TaskCollection {
        let mut collection = TaskCollection::default();
        let mut single_count = 0;
        let mut group_count = 0;

        for rule in rules {
            match &rule.group {
                Some(_) if rule.malformed.is_some() => {
                    group_count += 1;
                    self.skip_malformed(format!("g{}", group_count), rule);
                }
                Some(members) => {
                    group_count += 1;
                    let mut group = Group::new(group_count);
                    group.name = rule.name.clone();
                    group.key = rule.key.clone();

                    for (position, member) in members.iter().enumerate() {
                        let num = TaskId::Grouped {
                            group: group_count,
                            index: position + 1,
                        };
                        if let Some(mut task) = self.validate(num, member) {
                            // 组内串行执行，不支持 delay
                            task.delay = None;
                            group.tasks.push(task);
                        }
                    }

                    collection.groups.push(group);
                }
                None => {
                    single_count += 1;
                    if let Some(task) = self.validate(TaskId::Single(single_count), rule) {
                        collection.singles.push(task);
                    }
                }
            }
        }

        debug!(
            singles = collection.singles.len(),
            groups = collection.groups.len(),
            skipped = self.skipped.len(),
            "tasks built"
        );

        collection
    }

    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    fn validate(&mut self, num: TaskId, rule: &Rule) -> Option<Task> {
        if rule.malformed.is_some() {
            self.skip_malformed(num.to_string(), rule);
            return None;
        }

        let method_label = method_label(rule);

        let Some(uri) = rule.uri.as_deref() else {
            self.skip(num.to_string(), method_label, "", "missing uri");
            return None;
        };

        let method = match rule.method.as_deref() {
            None => Method::Get,
            Some(raw) => match Method::parse(raw) {
                Ok(method) => method,
                Err(e) => {
                    self.skip(num.to_string(), method_label, uri, &e.to_string());
                    return None;
                }
            },
        };

        if !is_valid_uri(uri) {
            self.skip(num.to_string(), method_label, uri, "invalid uri");
            return None;
        }

        let headers = rule.headers.as_ref().map(|headers| {
            headers
                .iter()
                .map(|(name, value)| (name.clone(), value_to_string(value)))
                .collect()
        });

        Some(Task {
            num,
            method,
            uri: uri.to_string(),
            name: rule.name.clone(),
            headers,
            form: rule.form.clone(),
            body: rule.body.clone(),
            delay: rule.delay,
            response: rule.response.clone(),
        })
    }

    fn skip_malformed(&mut self, num: String, rule: &Rule) {
        let reason = rule.malformed.as_deref().unwrap_or("malformed rule");
        let uri = rule.uri.as_deref().unwrap_or("");
        self.skip(num, method_label(rule), uri, reason);
    }

    fn skip(&mut self, num: String, method: String, uri: &str, reason: &str) {
        warn!(num = %num, method = %method, uri = %uri, reason = %reason, "rule skipped");
        self.skipped.push(SkippedRule {
            num,
            method,
            uri: uri.to_string(),
            reason: reason.to_string(),
        });
    }
}

fn method_label(rule: &Rule) -> String {
    rule.method
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| Method::Get.to_string())
}

/// 构建任务集合，不关心被丢弃的规则
pub fn build_tasks(rules: &[Rule]) -> TaskCollection {
    TaskBuilder::new().build(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::ResponseExpectation;
    use serde_json::json;

    fn rules(value: serde_json::Value) -> Vec<Rule> {
        value
            .as_array()
            .unwrap()
            .iter()
            .cloned()
            .map(Rule::from_value)
            .collect()
    }

    fn grouped(group: usize, index: usize, uri: &str) -> Task {
        Task::new(TaskId::Grouped { group, index }, Method::Get, uri)
    }

    #[test]
    fn test_empty_rules() {
        assert_eq!(build_tasks(&[]), TaskCollection::default());
    }

    #[test]
    fn test_rule_without_uri_or_group() {
        let mut builder = TaskBuilder::new();
        let collection = builder.build(&rules(json!([{}])));

        assert_eq!(collection, TaskCollection::default());
        assert_eq!(builder.skipped().len(), 1);
        assert_eq!(builder.skipped()[0].reason, "missing uri");
    }

    #[test]
    fn test_single_defaults_to_get() {
        let collection = build_tasks(&rules(json!([
            {"uri": "http://www.google.com", "response": {}}
        ])));

        assert_eq!(
            collection.singles,
            vec![
                Task::new(TaskId::Single(1), Method::Get, "http://www.google.com")
                    .with_response(ResponseExpectation::default())
            ]
        );
        assert!(collection.groups.is_empty());
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let collection = build_tasks(&rules(json!([
            {"method": "put", "uri": "http://www.google.com", "response": {}}
        ])));

        assert_eq!(collection.singles.len(), 1);
        assert_eq!(collection.singles[0].method, Method::Put);
    }

    #[test]
    fn test_unknown_method_is_dropped() {
        let mut builder = TaskBuilder::new();
        let collection = builder.build(&rules(json!([
            {"method": "del", "uri": "http://www.google.com", "response": {}}
        ])));

        assert!(collection.singles.is_empty());
        let skipped = &builder.skipped()[0];
        assert_eq!(skipped.method, "DEL");
        assert_eq!(skipped.uri, "http://www.google.com");
    }

    #[test]
    fn test_invalid_uri_is_dropped() {
        let collection = build_tasks(&rules(json!([
            {"uri": "www.google.com", "headers": {}, "form": {}, "body": {}}
        ])));

        assert_eq!(collection, TaskCollection::default());
    }

    #[test]
    fn test_non_string_uri_skips_only_that_rule() {
        let mut builder = TaskBuilder::new();
        let collection = builder.build(&rules(json!([
            {"uri": "http://a.com"},
            {"uri": 42},
            {"uri": "http://b.com"}
        ])));

        let nums: Vec<_> = collection.singles.iter().map(|t| t.num.clone()).collect();
        assert_eq!(nums, vec![TaskId::Single(1), TaskId::Single(3)]);
        assert_eq!(builder.skipped().len(), 1);
        assert_eq!(builder.skipped()[0].num, "2");
        assert_eq!(builder.skipped()[0].uri, "42");
    }

    #[test]
    fn test_non_string_method_skips_only_that_rule() {
        let mut builder = TaskBuilder::new();
        let collection = builder.build(&rules(json!([
            {"method": 5, "uri": "http://a.com", "response": {}},
            {"method": "post", "uri": "http://a.com"}
        ])));

        assert_eq!(collection.singles.len(), 1);
        assert_eq!(collection.singles[0].method, Method::Post);
        let skipped = &builder.skipped()[0];
        assert_eq!(skipped.num, "1");
        assert_eq!(skipped.method, "5");
    }

    #[test]
    fn test_malformed_group_member_and_group() {
        let mut builder = TaskBuilder::new();
        let collection = builder.build(&rules(json!([
            {"name": 3, "group": [{"uri": "http://a.com"}]},
            {"group": [{"uri": "http://a.com", "response": {"statuscode": "x"}}, {"uri": "http://b.com"}]}
        ])));

        assert_eq!(collection.groups.len(), 1);
        let group = &collection.groups[0];
        assert_eq!(group.num, 2);
        assert_eq!(group.tasks, vec![grouped(2, 2, "http://b.com")]);

        let nums: Vec<_> = builder.skipped().iter().map(|s| s.num.as_str()).collect();
        assert_eq!(nums, vec!["g1", "g2-1"]);
    }

    #[test]
    fn test_counter_advances_past_dropped_rules() {
        let collection = build_tasks(&rules(json!([
            {"uri": "www.google.com"},
            {"uri": "http://www.bing.com"}
        ])));

        assert_eq!(collection.singles[0].num, TaskId::Single(2));
    }

    #[test]
    fn test_group_with_invalid_member() {
        let mut builder = TaskBuilder::new();
        let collection = builder.build(&rules(json!([{"group": [{}]}])));

        assert!(collection.singles.is_empty());
        assert_eq!(collection.groups, vec![Group::new(1)]);
        assert_eq!(builder.skipped()[0].num, "g1-1");
    }

    #[test]
    fn test_empty_group_is_kept() {
        let collection = build_tasks(&rules(json!([{"group": []}])));
        assert_eq!(collection.groups, vec![Group::new(1)]);
    }

    #[test]
    fn test_group_numbering() {
        let collection = build_tasks(&rules(json!([
            {"group": [{"uri": "http://www.google.com"}, {"uri": "http://www.bing.com"}]},
            {"group": [{"uri": "http://www.google.com"}]}
        ])));

        let mut first = Group::new(1);
        first.tasks = vec![
            grouped(1, 1, "http://www.google.com"),
            grouped(1, 2, "http://www.bing.com"),
        ];
        let mut second = Group::new(2);
        second.tasks = vec![grouped(2, 1, "http://www.google.com")];

        assert_eq!(collection.groups, vec![first, second]);
    }

    #[test]
    fn test_group_members_keep_positional_numbers() {
        let collection = build_tasks(&rules(json!([
            {"group": [{"uri": "bad"}, {"uri": "http://www.bing.com", "delay": 500}]}
        ])));

        let tasks = &collection.groups[0].tasks;
        assert_eq!(tasks, &vec![grouped(1, 2, "http://www.bing.com")]);
        assert_eq!(tasks[0].delay, None);
    }

    #[test]
    fn test_group_name_and_key_are_copied() {
        let collection = build_tasks(&rules(json!([
            {"name": "users", "key": "id", "group": [{"uri": "http://x.com/users"}]}
        ])));

        let group = &collection.groups[0];
        assert_eq!(group.name.as_deref(), Some("users"));
        assert_eq!(group.key.as_deref(), Some("id"));
    }

    #[test]
    fn test_header_values_are_stringified() {
        let collection = build_tasks(&rules(json!([
            {"uri": "http://x.com", "headers": {"x-count": 3, "accept": "text/plain"}, "delay": 20}
        ])));

        let task = &collection.singles[0];
        let headers = task.headers.as_ref().unwrap();
        assert_eq!(headers["x-count"], "3");
        assert_eq!(headers["accept"], "text/plain");
        assert_eq!(task.delay, Some(20));
    }
}
