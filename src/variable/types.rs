use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::report::OutputMode;

/// 变量上下文，存储所有可用变量
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    variables: HashMap<String, String>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// 批量插入变量
    pub fn extend(&mut self, vars: HashMap<String, String>) {
        self.variables.extend(vars);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// 环境配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Environment {
    #[serde(flatten)]
    pub variables: HashMap<String, String>,
}

/// `[run]` 表，所有字段都可被命令行参数覆盖
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub output: Option<OutputMode>,
    pub only_failures: Option<bool>,
    /// 循环间隔（毫秒）
    #[serde(rename = "loop")]
    pub loop_ms: Option<u64>,
    pub max_runs: Option<usize>,
    pub output_file: Option<String>,
    pub output_path: Option<PathBuf>,
    /// 结果存储目录
    pub connection: Option<PathBuf>,
    pub collection: Option<String>,
    pub max_in_flight: Option<usize>,
    /// 请求超时（秒）
    pub timeout: Option<u64>,
}

impl RunSettings {
    /// 用 `overrides` 中出现的字段覆盖当前值
    pub fn merge(self, overrides: RunSettings) -> RunSettings {
        RunSettings {
            output: overrides.output.or(self.output),
            only_failures: overrides.only_failures.or(self.only_failures),
            loop_ms: overrides.loop_ms.or(self.loop_ms),
            max_runs: overrides.max_runs.or(self.max_runs),
            output_file: overrides.output_file.or(self.output_file),
            output_path: overrides.output_path.or(self.output_path),
            connection: overrides.connection.or(self.connection),
            collection: overrides.collection.or(self.collection),
            max_in_flight: overrides.max_in_flight.or(self.max_in_flight),
            timeout: overrides.timeout.or(self.timeout),
        }
    }
}

/// 完整的配置文件 `apirequests.toml`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VariableConfig {
    #[serde(default)]
    pub run: RunSettings,

    /// 所有环境配置
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl VariableConfig {
    /// 获取指定环境的变量
    pub fn get_environment(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }
}
