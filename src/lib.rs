pub mod assertion;
pub mod error;
pub mod http;
pub mod logger;
pub mod report;
pub mod rule;
pub mod runner;
pub mod store;
pub mod task;
pub mod uri;
pub mod variable;

// Re-export commonly used types
pub use error::{ApiRequestsError, Result};
