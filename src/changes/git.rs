use std::io;
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run `git {args}`: {source}")]
    Launch {
        args: String,
        #[source]
        source: io::Error,
    },
    #[error("`git {args}` exited with code {code}: {stderr}")]
    Exit {
        args: String,
        code: i32,
        stderr: String,
    },
}

/// The two version-control queries change detection needs.
pub trait VersionControl {
    /// Fetch `reference` from `remote`, limited to `depth` commits.
    fn fetch(&self, remote: &str, reference: &str, depth: u32) -> Result<(), VcsError>;

    /// Paths that differ between `base` and `head`, in the tool's order.
    fn diff_names(&self, base: &str, head: &str) -> Result<Vec<String>, VcsError>;
}

impl<T: VersionControl + ?Sized> VersionControl for &T {
    fn fetch(&self, remote: &str, reference: &str, depth: u32) -> Result<(), VcsError> {
        (**self).fetch(remote, reference, depth)
    }

    fn diff_names(&self, base: &str, head: &str) -> Result<Vec<String>, VcsError> {
        (**self).diff_names(base, head)
    }
}

/// [`VersionControl`] backed by the `git` CLI.
#[derive(Debug, Clone, Default)]
pub struct Git {
    work_dir: Option<PathBuf>,
}

impl Git {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: Some(dir.into()),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        let out = cmd.output().map_err(|source| VcsError::Launch {
            args: args.join(" "),
            source,
        })?;
        if !out.status.success() {
            return Err(VcsError::Exit {
                args: args.join(" "),
                code: out.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl VersionControl for Git {
    fn fetch(&self, remote: &str, reference: &str, depth: u32) -> Result<(), VcsError> {
        let depth = format!("--depth={depth}");
        self.run(&["fetch", remote, reference, &depth]).map(drop)
    }

    fn diff_names(&self, base: &str, head: &str) -> Result<Vec<String>, VcsError> {
        let out = self.run(&["diff", "--name-only", base, head])?;
        Ok(out
            .trim()
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
