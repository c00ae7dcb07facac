use std::collections::BTreeMap;
use std::io;

use thiserror::Error;

/// Describes a single child-process invocation. The pipeline layer is
/// responsible for assembling `args`; `env` is applied to this child only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    /// Written to the child's stdin, which is closed afterwards. Without
    /// input the child gets a null stdin.
    pub input: Option<CapturedOutput>,
    /// Capture stdout instead of passing it through to the host.
    pub capture_stdout: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn input(mut self, input: CapturedOutput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    /// Shell-quoted command line, for logs only.
    pub fn display(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(&self.args))
    }
}

/// Bytes accumulated from one child stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput(Vec<u8>);

impl CapturedOutput {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<Vec<u8>> for CapturedOutput {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for CapturedOutput {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// Outcome of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code; `-1` when the child was terminated by a signal.
    pub code: i32,
    /// Empty unless the invocation asked for stdout capture.
    pub stdout: CapturedOutput,
    pub stderr: CapturedOutput,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs child processes to completion.
///
/// Each call blocks until the child has exited and its captured streams are
/// fully drained.
pub trait Executor {
    fn execute(&self, invocation: Invocation) -> Result<ExitOutcome, ProcessError>;
}

impl<T: Executor + ?Sized> Executor for &T {
    fn execute(&self, invocation: Invocation) -> Result<ExitOutcome, ProcessError> {
        (**self).execute(invocation)
    }
}
