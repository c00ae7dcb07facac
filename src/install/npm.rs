use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::info;

use super::ToolInstaller;
use crate::pipeline::ToolCommand;

/// Installs a package globally with npm and invokes its binary by name.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    name: String,
    package: String,
}

impl NpmInstaller {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
        }
    }

    pub fn vectorlint() -> Self {
        Self::new("VectorLint", "vectorlint")
    }

    pub fn install_args(&self, version: &str) -> Vec<String> {
        vec![
            "install".into(),
            "-g".into(),
            format!("{}@{version}", self.package),
        ]
    }
}

fn npm_program() -> &'static str {
    if cfg!(windows) { "npm.cmd" } else { "npm" }
}

impl ToolInstaller for NpmInstaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, version: &str) -> Result<ToolCommand> {
        let args = self.install_args(version);
        let status = Command::new(npm_program())
            .args(&args)
            .status()
            .context("failed to invoke `npm`; is Node.js installed?")?;
        if !status.success() {
            bail!("`npm {}` exited with {status}", args.join(" "));
        }

        info!("{} {version} installed successfully.", self.name);
        Ok(ToolCommand::new(&self.name, &self.package))
    }
}
