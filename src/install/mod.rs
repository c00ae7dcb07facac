// Tool installation: get vectorlint and reviewdog onto the runner.

mod npm;
mod script;

pub use npm::NpmInstaller;
pub use script::{REVIEWDOG_INSTALL_SCRIPT, ScriptInstaller};

use anyhow::{Context, Result};

use crate::logging::Group;
use crate::pipeline::ToolCommand;

/// Installs one external tool and says how to invoke it.
pub trait ToolInstaller {
    /// Display name for logs and errors.
    fn name(&self) -> &str;

    /// Whether [`install`](Self::install) does real work worth a log group.
    fn performs_install(&self) -> bool {
        true
    }

    fn install(&self, version: &str) -> Result<ToolCommand>;
}

/// Run `installer`, wrapping failures as `Failed to install <name>`.
///
/// Real installs run inside a log group.
pub fn install_tool(installer: &dyn ToolInstaller, version: &str) -> Result<ToolCommand> {
    let _group = installer
        .performs_install()
        .then(|| Group::start(&format!("Installing {}", installer.name())));
    installer
        .install(version)
        .with_context(|| format!("Failed to install {}", installer.name()))
}

/// A tool that is already on `PATH`; installing is a no-op.
#[derive(Debug, Clone)]
pub struct Preinstalled {
    name: String,
    program: String,
}

impl Preinstalled {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
        }
    }
}

impl ToolInstaller for Preinstalled {
    fn name(&self) -> &str {
        &self.name
    }

    fn performs_install(&self) -> bool {
        false
    }

    fn install(&self, _version: &str) -> Result<ToolCommand> {
        tracing::info!("Using {} from PATH", self.program);
        Ok(ToolCommand::new(&self.name, &self.program))
    }
}
