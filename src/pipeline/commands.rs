use crate::process::{CapturedOutput, Invocation};

use super::types::{PipelineConfig, ToolCommand};

/// Flags that make the linter write an rdjson report to stdout.
pub const STRUCTURED_OUTPUT_FLAGS: [&str; 2] = ["--output", "rdjson"];

/// Input format the reporter is told to expect.
pub const REPORT_FORMAT: &str = "rdjson";

/// Split user-supplied flags on single spaces.
///
/// Repeated spaces yield empty arguments and tabs or newlines stay inside an
/// argument. Quoted values containing spaces are split too; there is no
/// shell-style tokenization here.
pub fn split_flags(flags: &str) -> Vec<String> {
    if flags.is_empty() {
        return Vec::new();
    }
    flags.split(' ').map(str::to_string).collect()
}

/// Linter arguments: structured-output flag, extra flags, then targets.
pub fn linter_args(cfg: &PipelineConfig) -> Vec<String> {
    let mut args: Vec<String> = STRUCTURED_OUTPUT_FLAGS
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.extend(split_flags(&cfg.lint_flags));
    args.extend(cfg.files.to_args());
    args
}

/// Reporter arguments, all taken verbatim from config.
pub fn reporter_args(cfg: &PipelineConfig) -> Vec<String> {
    vec![
        format!("-f={REPORT_FORMAT}"),
        format!("-name={}", cfg.tool_name),
        format!("-reporter={}", cfg.reporter),
        format!("-filter-mode={}", cfg.filter_mode),
        format!("-fail-on-error={}", cfg.fail_on_error),
    ]
}

/// Build the linter invocation; its stdout is the report.
pub fn linter_invocation(tool: &ToolCommand, cfg: &PipelineConfig) -> Invocation {
    tool.invocation().args(linter_args(cfg)).capture_stdout()
}

/// Build the reporter invocation, feeding `report` on stdin.
pub fn reporter_invocation(
    tool: &ToolCommand,
    cfg: &PipelineConfig,
    report: CapturedOutput,
) -> Invocation {
    tool.invocation().args(reporter_args(cfg)).input(report)
}
