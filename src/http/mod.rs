pub mod client;
pub mod response;
pub mod types;

// Re-export commonly used types for convenient access
pub use client::{Client, Requester};
pub use response::{RequestInfo, Response, ResponseBody};
pub use types::Method;
