//! CLI library components for census-prep.

pub mod logging;
pub mod pipeline;
pub mod types;

pub use pipeline::run_pipeline;
pub use types::{FactJoinSummary, RunResult};
