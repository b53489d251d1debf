/// 任务模块 - 把规则校验、编号为可执行任务
pub mod builder;
pub mod types;

pub use builder::{SkippedRule, TaskBuilder, build_tasks};
pub use types::{Group, Task, TaskCollection, TaskId};
