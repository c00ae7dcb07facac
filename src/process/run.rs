use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use super::types::{ExitOutcome, Executor, Invocation, ProcessError};

const CHUNK_SIZE: usize = 8 * 1024;

/// Runs invocations as real child processes.
///
/// stderr is always tee'd: echoed live to the host's stderr and retained in
/// the outcome. stdout is either captured or inherited.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    work_dir: Option<PathBuf>,
}

impl SystemExecutor {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: Some(dir.into()),
        }
    }
}

impl Executor for SystemExecutor {
    fn execute(&self, invocation: Invocation) -> Result<ExitOutcome, ProcessError> {
        let Invocation {
            program,
            args,
            env,
            input,
            capture_stdout,
        } = invocation;

        let mut command = Command::new(&program);
        command
            .args(&args)
            .envs(&env)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(if capture_stdout {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .stderr(Stdio::piped());
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

        // --- pipe threads ------------------------------------------------------
        let stdin_handle = match (child.stdin.take(), input) {
            (Some(mut stdin), Some(input)) => Some(thread::spawn(move || {
                // Broken pipe when the child exits without reading it all.
                let _ = stdin.write_all(input.as_bytes());
            })),
            _ => None,
        };
        let stdout_handle = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || capture(stdout)));
        let stderr_handle = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || tee(stderr, io::stderr())));

        // --- finalize ----------------------------------------------------------
        let status = child.wait().map_err(|source| ProcessError::Wait {
            program: program.clone(),
            source,
        })?;

        if let Some(handle) = stdin_handle {
            let _ = handle.join();
        }
        let stdout = join_bytes(stdout_handle);
        let stderr = join_bytes(stderr_handle);

        Ok(ExitOutcome {
            code: status.code().unwrap_or(-1),
            stdout: stdout.into(),
            stderr: stderr.into(),
        })
    }
}

fn join_bytes(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Read a stream to its end. Read errors end the capture early.
fn capture(mut reader: impl Read) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf);
    buf
}

/// Copy a stream into `echo` as it arrives while retaining every byte.
///
/// Echo failures are ignored; the retained copy is authoritative.
pub(crate) fn tee(mut reader: impl Read, mut echo: impl Write) -> Vec<u8> {
    let mut retained = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let _ = echo.write_all(&chunk[..n]);
                let _ = echo.flush();
                retained.extend_from_slice(&chunk[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    retained
}
