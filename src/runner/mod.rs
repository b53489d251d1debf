pub mod chain;
pub mod correlator;
pub mod executor;
pub mod orchestrator;
pub mod reporter;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use chain::{chain_uri, run_group};
pub use correlator::fill_results;
pub use executor::TaskExecutor;
pub use orchestrator::{LoopOptions, Runner};
pub use reporter::TestReporter;
pub use types::{GroupResult, Pair, RunResults, TaskRun, TestResult, TestSummary};
