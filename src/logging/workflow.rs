//! GitHub Actions workflow commands.
//!
//! Log lines written to stdout as `::warning::text` etc. are turned into
//! annotations by the runner. See
//! <https://docs.github.com/actions/reference/workflow-commands-for-github-actions>.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Whether we are running inside a GitHub Actions job.
pub fn is_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escape command data: `%`, CR and LF would otherwise end or corrupt the command.
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn command_for(level: Level) -> Option<&'static str> {
    match level {
        Level::ERROR => Some("error"),
        Level::WARN => Some("warning"),
        Level::DEBUG | Level::TRACE => Some("debug"),
        _ => None,
    }
}

/// Event formatter that renders warnings and errors as workflow commands.
/// Info events are printed as plain lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowFormat;

impl<S, N> FormatEvent<S, N> for WorkflowFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.field_format()
            .format_fields(format::Writer::new(&mut message), event)?;

        match command_for(*event.metadata().level()) {
            Some(command) => writeln!(writer, "::{command}::{}", escape_data(&message)),
            None => writeln!(writer, "{message}"),
        }
    }
}

/// A collapsible log group; closed on drop.
///
/// Outside Actions the title is logged as a normal info line.
#[must_use = "the group ends when this guard is dropped"]
pub struct Group {
    active: bool,
}

impl Group {
    pub fn start(title: &str) -> Self {
        let active = is_actions();
        if active {
            println!("::group::{}", escape_data(title));
        } else {
            tracing::info!("{title}");
        }
        Self { active }
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        if self.active {
            println!("::endgroup::");
        }
    }
}

/// Register `dir` for later steps of the job via the `GITHUB_PATH` file.
///
/// Does nothing when `GITHUB_PATH` is unset.
pub fn add_path(dir: &Path) -> io::Result<()> {
    match std::env::var_os("GITHUB_PATH").filter(|v| !v.is_empty()) {
        Some(path_file) => append_path_entry(Path::new(&path_file), dir),
        None => Ok(()),
    }
}

fn append_path_entry(path_file: &Path, dir: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path_file)?;
    writeln!(file, "{}", dir.display())
}
