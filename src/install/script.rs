use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::info;

use super::ToolInstaller;
use crate::logging;
use crate::pipeline::ToolCommand;

pub const REVIEWDOG_INSTALL_SCRIPT: &str =
    "https://raw.githubusercontent.com/reviewdog/reviewdog/master/install.sh";

/// Installs a binary with a `install.sh -b <dir> [version]` style script.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    name: String,
    binary: String,
    script_url: String,
    install_dir: PathBuf,
}

impl ScriptInstaller {
    pub fn new(
        name: impl Into<String>,
        binary: impl Into<String>,
        script_url: impl Into<String>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            binary: binary.into(),
            script_url: script_url.into(),
            install_dir: install_dir.into(),
        }
    }

    pub fn reviewdog(install_dir: impl Into<PathBuf>) -> Self {
        Self::new("reviewdog", "reviewdog", REVIEWDOG_INSTALL_SCRIPT, install_dir)
    }

    /// Arguments for the install script; `latest` passes no version.
    pub fn script_args(&self, version: &str) -> Vec<String> {
        let mut args = vec!["-b".to_string(), self.install_dir.display().to_string()];
        if version != "latest" {
            args.push(version.to_string());
        }
        args
    }

    /// Shell pipeline that downloads and runs the script.
    pub fn shell_command(&self, version: &str) -> String {
        format!(
            "curl -sfL {} | sh -s -- {}",
            shell_words::quote(&self.script_url),
            shell_words::join(self.script_args(version))
        )
    }

    pub fn executable(&self) -> PathBuf {
        if cfg!(windows) {
            self.install_dir.join(format!("{}.exe", self.binary))
        } else {
            self.install_dir.join(&self.binary)
        }
    }
}

impl ToolInstaller for ScriptInstaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, version: &str) -> Result<ToolCommand> {
        std::fs::create_dir_all(&self.install_dir).with_context(|| {
            format!("failed to create {}", self.install_dir.display())
        })?;

        info!(
            "Running install script to {} with version {version}...",
            self.install_dir.display()
        );
        let status = Command::new("sh")
            .args(["-c", &self.shell_command(version)])
            .status()
            .context("failed to invoke `sh`")?;
        if !status.success() {
            bail!("install script exited with {status}");
        }

        // `curl | sh` succeeds even when the download fails.
        let executable = self.executable();
        if !executable.is_file() {
            bail!(
                "install script finished but {} is missing",
                executable.display()
            );
        }

        logging::add_path(&self.install_dir).with_context(|| {
            format!("failed to add {} to GITHUB_PATH", self.install_dir.display())
        })?;
        info!("{} installed and added to path", self.name);

        Ok(ToolCommand::new(&self.name, executable.display().to_string()))
    }
}
