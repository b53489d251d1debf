/// 规则模块 - 规则文件的数据模型与加载
pub mod loader;
pub mod serialization;
pub mod types;

pub use loader::RuleLoader;
pub use types::Rule;
