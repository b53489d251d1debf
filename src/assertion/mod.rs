/// 断言模块 - 比较实际响应与期望响应
pub mod evaluator;
pub mod extractor;
pub mod types;

pub use evaluator::{compare, evaluate};
pub use types::{BodyMode, HeaderExpectations, Output, ResponseExpectation};
