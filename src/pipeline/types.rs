use std::collections::BTreeMap;

use thiserror::Error;

use crate::process::{Invocation, ProcessError};
use crate::rdjson::Summary;

/// Files handed to the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSet {
    /// Scan everything under the working directory.
    EntireTree,
    /// Scan exactly these paths, in order.
    Paths(Vec<String>),
}

impl FileSet {
    /// Argument the linter receives for [`FileSet::EntireTree`].
    pub const ENTIRE_TREE: &'static str = ".";

    pub fn is_empty(&self) -> bool {
        match self {
            FileSet::EntireTree => false,
            FileSet::Paths(paths) => paths.is_empty(),
        }
    }

    pub fn to_args(&self) -> Vec<String> {
        match self {
            FileSet::EntireTree => vec![Self::ENTIRE_TREE.to_string()],
            FileSet::Paths(paths) => paths.clone(),
        }
    }
}

impl From<Vec<String>> for FileSet {
    fn from(paths: Vec<String>) -> Self {
        FileSet::Paths(paths)
    }
}

/// Options for one pipeline run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub files: FileSet,
    /// Extra linter flags, split on single spaces.
    pub lint_flags: String,
    /// Display label passed to the reporter.
    pub tool_name: String,
    /// Reporter backend, e.g. `github-pr-check`.
    pub reporter: String,
    pub filter_mode: String,
    /// Passed through verbatim; only the exact string `"false"` disables gating.
    pub fail_on_error: String,
}

impl PipelineConfig {
    pub fn gates_on_reporter_exit(&self) -> bool {
        self.fail_on_error != "false"
    }
}

/// How to invoke one external tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCommand {
    /// Name used in logs and error messages.
    pub name: String,
    pub program: String,
    /// Arguments placed before everything the pipeline adds (`npx vectorlint ...`).
    pub leading_args: Vec<String>,
    /// Environment visible to this tool's process only.
    pub env: BTreeMap<String, String>,
}

impl ToolCommand {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Start an invocation carrying the leading args and scoped env.
    pub fn invocation(&self) -> Invocation {
        Invocation::new(&self.program)
            .args(&self.leading_args)
            .envs(&self.env)
    }
}

/// The linter and reporter a runner drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub linter: ToolCommand,
    pub reporter: ToolCommand,
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    /// No files to scan; neither tool ran.
    Skipped,
    Completed {
        linter_exit: i32,
        reporter_exit: i32,
        /// `None` when the report could not be read as rdjson.
        diagnostics: Option<Summary>,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// The linter exited non-zero without writing a report.
    #[error("{tool} failed with exit code {code}: {stderr}")]
    LinterFailed {
        tool: String,
        code: i32,
        stderr: String,
    },
    #[error("The process '{tool}' failed with exit code {code}")]
    ReporterFailed { tool: String, code: i32 },
}
