// Child-process execution: spawn, feed stdin, capture stdout, tee stderr.

pub mod run;
pub mod types;

pub use run::SystemExecutor;
pub use types::{CapturedOutput, ExitOutcome, Executor, Invocation, ProcessError};
