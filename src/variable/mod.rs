/// 变量模块 - 配置文件、环境与 `{{var}}` 替换
pub mod config;
pub mod resolver;
pub mod types;

pub use config::ConfigLoader;
pub use resolver::VariableResolver;
pub use types::{Environment, RunSettings, VariableConfig, VariableContext};
