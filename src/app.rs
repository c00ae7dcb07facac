use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use crate::changes::{ChangeSetResolver, Git, select_targets};
use crate::config::{self, Cli, Settings};
use crate::install::{self, NpmInstaller, Preinstalled, ScriptInstaller, ToolInstaller};
use crate::pipeline::{PipelineRunner, RunSummary, Toolchain};
use crate::process::SystemExecutor;

/// Directory (under the workspace) reviewdog is installed into.
const INSTALL_DIR: &str = "bin";

/// Run the whole action: configure, install, pick targets, lint and report.
pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let settings = load_settings(&cli, &cwd)?;

    let tools = install_tools(&settings, &cwd)?;

    let resolver = ChangeSetResolver::new(Git::in_dir(&cwd));
    let files = select_targets(settings.base_ref.as_deref(), &resolver);
    if files.is_empty() {
        info!("No markdown files changed in this PR. Skipping.");
        return Ok(());
    }

    let runner = PipelineRunner::new(SystemExecutor::in_dir(&cwd), tools);
    match runner.run(&settings.pipeline_config(files))? {
        RunSummary::Skipped => info!("Nothing to lint."),
        RunSummary::Completed {
            linter_exit,
            reporter_exit,
            ..
        } => info!(linter_exit, reporter_exit, "Lint run finished"),
    }
    Ok(())
}

/// Failure message used when the run panics.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Run `f` and map its outcome to the process exit code.
///
/// An error or a panic is handed to `report_failure` (the full error chain,
/// or [`UNEXPECTED_ERROR`]) and exits with code 1.
pub fn run_guarded<F, R>(f: F, report_failure: R) -> ExitCode
where
    F: FnOnce() -> Result<()>,
    R: FnOnce(&str),
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            report_failure(&format!("{err:#}"));
            ExitCode::FAILURE
        }
        Err(_) => {
            report_failure(UNEXPECTED_ERROR);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(cli: &Cli, cwd: &Path) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => config::load(path)?,
        None => config::load_from_dir(cwd)?.unwrap_or_default(),
    };
    Ok(cli.resolve(file, |key| std::env::var(key).ok()))
}

fn install_tools(settings: &Settings, cwd: &Path) -> Result<Toolchain> {
    let (linter, reporter): (Box<dyn ToolInstaller>, Box<dyn ToolInstaller>) =
        if settings.skip_install {
            (
                Box::new(Preinstalled::new("VectorLint", "vectorlint")),
                Box::new(Preinstalled::new("reviewdog", "reviewdog")),
            )
        } else {
            (
                Box::new(NpmInstaller::vectorlint()),
                Box::new(ScriptInstaller::reviewdog(cwd.join(INSTALL_DIR))),
            )
        };

    let linter = install::install_tool(linter.as_ref(), &settings.vectorlint_version)?
        .with_env(settings.linter_env.clone());
    let reporter = install::install_tool(reporter.as_ref(), &settings.reviewdog_version)?
        .with_env(config::env::reporter_env(settings.github_token.as_deref()));

    Ok(Toolchain { linter, reporter })
}
