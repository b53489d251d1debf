/// 结果存储模块 - store 输出模式与 history 子命令
pub mod model;
pub mod printer;
pub mod serialization;
pub mod storage;

pub use model::StoredResult;
pub use printer::list_results;
pub use storage::ResultStore;
