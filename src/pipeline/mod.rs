pub mod commands;
pub mod orchestrator;
mod types;

pub use orchestrator::PipelineRunner;
pub use types::{FileSet, PipelineConfig, PipelineError, RunSummary, ToolCommand, Toolchain};
