use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::variable::resolver::VariableResolver;
use crate::variable::types::{VariableConfig, VariableContext};
use crate::{ApiRequestsError, Result};

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    const CONFIG_FILE: &'static str = "apirequests.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<VariableConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ApiRequestsError::ConfigError(format!("无法读取 {}: {}", path.display(), e))
        })?;

        let config = toml::from_str(&content)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// 加载配置：显式路径优先，否则自动查找，找不到时使用默认配置
    pub fn load(explicit: Option<&Path>) -> Result<VariableConfig> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::find_config_file() {
                Some(path) => Self::load_from_path(path),
                None => Ok(VariableConfig::default()),
            },
        }
    }

    /// 查找配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/apirequests/
    pub fn find_config_file() -> Option<PathBuf> {
        Self::find_in_ancestors().or_else(Self::find_in_user_dir)
    }

    fn find_in_ancestors() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        current
            .ancestors()
            .map(|dir| dir.join(Self::CONFIG_FILE))
            .find(|path| path.exists())
    }

    fn find_in_user_dir() -> Option<PathBuf> {
        let path = dirs::home_dir()?
            .join(".config")
            .join("apirequests")
            .join(Self::CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// 构建变量上下文
    /// env_name: 环境名称（如 "dev", "prod"）
    /// cli_vars: CLI 传入的变量覆盖（--var key=value）
    pub fn build_context(
        config: &VariableConfig,
        env_name: Option<&str>,
        cli_vars: &[(String, String)],
    ) -> Result<VariableContext> {
        let mut context = VariableContext::new();

        if let Some(name) = env_name {
            let env = config.get_environment(name).ok_or_else(|| {
                ApiRequestsError::ConfigError(format!("未定义的环境: {}", name))
            })?;
            for (key, value) in &env.variables {
                context.insert(key.clone(), VariableResolver::resolve_env_vars(value));
            }
        }

        // CLI 覆盖优先级最高
        for (key, value) in cli_vars {
            context.insert(key.clone(), value.clone());
        }

        Ok(context)
    }

    /// 解析 CLI 变量参数 "key=value"
    pub fn parse_cli_var(s: &str) -> Option<(String, String)> {
        s.split_once('=')
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
    }
}
