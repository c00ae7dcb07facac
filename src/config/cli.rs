use std::path::PathBuf;

use clap::Parser;
use clap::builder::FalseyValueParser;

use super::env::linter_env;
use super::types::{
    DEFAULT_FAIL_ON_ERROR, DEFAULT_FILTER_MODE, DEFAULT_REPORTER, DEFAULT_TOOL_NAME,
    DEFAULT_VERSION, FileConfig, Settings, non_empty,
};

/// Lint Markdown with VectorLint and report findings through reviewdog.
///
/// Every option can also be supplied as a GitHub Actions input.
#[derive(Debug, Default, Parser)]
#[command(name = "vectorlint-action", version, about)]
pub struct Cli {
    /// VectorLint version to install from npm
    #[arg(long, env = "INPUT_VECTORLINT_VERSION")]
    pub vectorlint_version: Option<String>,

    /// reviewdog version to install (`latest` or a tag such as v0.20.3)
    #[arg(long, env = "INPUT_REVIEWDOG_VERSION")]
    pub reviewdog_version: Option<String>,

    /// Name shown for findings in the reporter
    #[arg(long, env = "INPUT_TOOL_NAME")]
    pub tool_name: Option<String>,

    /// reviewdog reporter backend (github-pr-check, github-pr-review, local, ...)
    #[arg(long, env = "INPUT_REPORTER")]
    pub reporter: Option<String>,

    /// reviewdog filter mode (added, diff_context, file, nofilter)
    #[arg(long, env = "INPUT_FILTER_MODE")]
    pub filter_mode: Option<String>,

    /// Fail the job when reviewdog reports findings ("true" or "false")
    #[arg(long, env = "INPUT_FAIL_ON_ERROR")]
    pub fail_on_error: Option<String>,

    /// Extra VectorLint flags, separated by whitespace
    #[arg(long, env = "INPUT_VECTORLINT_FLAGS", allow_hyphen_values = true)]
    pub vectorlint_flags: Option<String>,

    /// Base branch of the pull request; only changed files are linted when set
    #[arg(long, env = "GITHUB_BASE_REF")]
    pub base_ref: Option<String>,

    /// GitHub token handed to reviewdog (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Use vectorlint and reviewdog from PATH instead of installing them
    #[arg(long, env = "INPUT_SKIP_INSTALL", value_parser = FalseyValueParser::new())]
    pub skip_install: bool,

    /// YAML config file (defaults to .vectorlint-action.yml when present)
    #[arg(long, env = "INPUT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge flags/env over the config file over built-in defaults.
    ///
    /// `lookup` reads process environment variables that are not clap
    /// arguments: the `GITHUB_TOKEN` fallback and provider inputs.
    pub fn resolve<F>(&self, file: FileConfig, lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |cli: &Option<String>, file: Option<String>, default: &str| {
            non_empty(cli.clone())
                .or_else(|| non_empty(file))
                .unwrap_or_else(|| default.to_string())
        };

        Settings {
            vectorlint_version: pick(&self.vectorlint_version, file.vectorlint_version, DEFAULT_VERSION),
            reviewdog_version: pick(&self.reviewdog_version, file.reviewdog_version, DEFAULT_VERSION),
            tool_name: pick(&self.tool_name, file.tool_name, DEFAULT_TOOL_NAME),
            reporter: pick(&self.reporter, file.reporter, DEFAULT_REPORTER),
            filter_mode: pick(&self.filter_mode, file.filter_mode, DEFAULT_FILTER_MODE),
            fail_on_error: pick(
                &self.fail_on_error,
                file.fail_on_error.map(|b| b.0),
                DEFAULT_FAIL_ON_ERROR,
            ),
            vectorlint_flags: pick(&self.vectorlint_flags, file.vectorlint_flags, ""),
            base_ref: non_empty(self.base_ref.clone()),
            github_token: non_empty(self.github_token.clone())
                .or_else(|| non_empty(lookup("GITHUB_TOKEN"))),
            skip_install: self.skip_install || file.skip_install.unwrap_or(false),
            linter_env: linter_env(&lookup),
        }
    }
}
