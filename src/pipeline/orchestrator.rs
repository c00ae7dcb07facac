use tracing::{debug, info, warn};

use crate::process::{CapturedOutput, ExitOutcome, Executor};
use crate::rdjson::{self, Summary};

use super::commands::{linter_invocation, reporter_invocation};
use super::types::{PipelineConfig, PipelineError, RunSummary, Toolchain};

/// Chains the linter into the reporter.
///
/// Stages run strictly in order: the linter's report is captured in full
/// before the reporter starts.
pub struct PipelineRunner<E> {
    executor: E,
    tools: Toolchain,
}

impl<E: Executor> PipelineRunner<E> {
    pub fn new(executor: E, tools: Toolchain) -> Self {
        Self { executor, tools }
    }

    pub fn run(&self, cfg: &PipelineConfig) -> Result<RunSummary, PipelineError> {
        // ── Empty check ──────────────────────────────────────────────────
        if cfg.files.is_empty() {
            info!("No files to scan.");
            return Ok(RunSummary::Skipped);
        }

        // ── Lint ─────────────────────────────────────────────────────────
        let linter = &self.tools.linter;
        let invocation = linter_invocation(linter, cfg);
        info!("Running {}: {}", linter.name, invocation.display());

        let outcome = self.executor.execute(invocation)?;
        let linter_exit = outcome.code;
        let report = accept_lint_outcome(&linter.name, outcome)?;
        let diagnostics = summarize(&report);

        // ── Report ───────────────────────────────────────────────────────
        let reporter = &self.tools.reporter;
        let invocation = reporter_invocation(reporter, cfg, report);
        info!("Running {}: {}", reporter.name, invocation.display());

        let outcome = self.executor.execute(invocation)?;
        let reporter_exit = outcome.code;
        if !outcome.success() {
            if cfg.gates_on_reporter_exit() {
                return Err(PipelineError::ReporterFailed {
                    tool: reporter.name.clone(),
                    code: reporter_exit,
                });
            }
            info!(
                code = reporter_exit,
                "{} exited non-zero; ignored because fail-on-error is false", reporter.name
            );
        }

        Ok(RunSummary::Completed {
            linter_exit,
            reporter_exit,
            diagnostics,
        })
    }
}

/// Decide whether a finished linter run produced a usable report.
///
/// A non-zero exit with a report means findings exist and is accepted. A
/// non-zero exit without one is a hard failure.
fn accept_lint_outcome(tool: &str, outcome: ExitOutcome) -> Result<CapturedOutput, PipelineError> {
    if outcome.success() {
        return Ok(outcome.stdout);
    }
    if outcome.stdout.is_empty() {
        return Err(PipelineError::LinterFailed {
            tool: tool.to_string(),
            code: outcome.code,
            stderr: outcome.stderr.to_string_lossy(),
        });
    }
    info!(
        code = outcome.code,
        "{tool} exited non-zero with a report; forwarding findings"
    );
    Ok(outcome.stdout)
}

fn summarize(report: &CapturedOutput) -> Option<Summary> {
    match rdjson::parse_report(report.as_bytes()) {
        Ok(parsed) => {
            let report_default = parsed.severity.as_deref();
            for diagnostic in &parsed.diagnostics {
                let (path, line) = diagnostic
                    .location
                    .as_ref()
                    .map(|loc| {
                        let line = loc.range.as_ref().map_or(0, |r| r.start.line);
                        (loc.path.as_str(), line)
                    })
                    .unwrap_or(("", 0));
                let severity = diagnostic.effective_severity(report_default);
                debug!(path, line, %severity, "{}", diagnostic.message);
            }
            let summary = parsed.summary();
            info!("Linter reported {summary}");
            Some(summary)
        }
        Err(e) => {
            if report.is_empty() {
                warn!("Linter produced no report; forwarding empty input");
            } else {
                debug!("report is not readable as rdjson ({e}); forwarding as-is");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::pipeline::{FileSet, ToolCommand};
    use crate::process::{Invocation, ProcessError};

    /// Returns scripted outcomes in order and records every invocation.
    #[derive(Default)]
    struct ScriptedExecutor {
        outcomes: RefCell<VecDeque<ExitOutcome>>,
        calls: RefCell<Vec<Invocation>>,
    }

    impl ScriptedExecutor {
        fn with(outcomes: Vec<ExitOutcome>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes.into()),
                calls: RefCell::default(),
            }
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }
    }

    impl Executor for ScriptedExecutor {
        fn execute(&self, invocation: Invocation) -> Result<ExitOutcome, ProcessError> {
            self.calls.borrow_mut().push(invocation);
            Ok(self
                .outcomes
                .borrow_mut()
                .pop_front()
                .expect("unexpected extra invocation"))
        }
    }

    fn outcome(code: i32, stdout: &str, stderr: &str) -> ExitOutcome {
        ExitOutcome {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    fn tools() -> Toolchain {
        Toolchain {
            linter: ToolCommand::new("VectorLint", "vectorlint"),
            reporter: ToolCommand::new("reviewdog", "reviewdog"),
        }
    }

    fn config(fail_on_error: &str) -> PipelineConfig {
        PipelineConfig {
            files: FileSet::Paths(vec!["doc.md".into()]),
            lint_flags: String::new(),
            tool_name: "lint".into(),
            reporter: "github-pr-check".into(),
            filter_mode: "added".into(),
            fail_on_error: fail_on_error.into(),
        }
    }

    const EMPTY_REPORT: &str = r#"{"diagnostics":[]}"#;

    #[test]
    fn empty_file_set_invokes_nothing() {
        let exec = ScriptedExecutor::default();
        let runner = PipelineRunner::new(&exec, tools());
        let mut cfg = config("true");
        cfg.files = FileSet::Paths(Vec::new());

        assert_eq!(runner.run(&cfg).unwrap(), RunSummary::Skipped);
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn linter_crash_without_report_is_fatal() {
        let exec = ScriptedExecutor::with(vec![outcome(2, "", "config not found\n")]);
        let runner = PipelineRunner::new(&exec, tools());

        let err = runner.run(&config("true")).unwrap_err();
        assert!(matches!(err, PipelineError::LinterFailed { code: 2, .. }));
        let message = err.to_string();
        assert!(message.contains('2'), "{message}");
        assert!(message.contains("config not found"), "{message}");
        // Reporter never ran.
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn linter_findings_with_nonzero_exit_are_forwarded() {
        let report = r#"{"diagnostics":[{"message":"x","severity":"ERROR"}]}"#;
        let exec = ScriptedExecutor::with(vec![outcome(1, report, ""), outcome(0, "", "")]);
        let runner = PipelineRunner::new(&exec, tools());

        let summary = runner.run(&config("true")).unwrap();
        match summary {
            RunSummary::Completed {
                linter_exit,
                reporter_exit,
                diagnostics,
            } => {
                assert_eq!(linter_exit, 1);
                assert_eq!(reporter_exit, 0);
                let diagnostics = diagnostics.unwrap();
                assert_eq!(diagnostics.errors, 1);
                assert_eq!(diagnostics.worst, Some(crate::rdjson::Severity::Error));
            }
            other => panic!("expected Completed, got: {other:?}"),
        }

        let calls = exec.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].input, Some(CapturedOutput::from(report)));
    }

    #[test]
    fn reporter_failure_ignored_when_fail_on_error_false() {
        let exec = ScriptedExecutor::with(vec![outcome(0, EMPTY_REPORT, ""), outcome(1, "", "")]);
        let runner = PipelineRunner::new(&exec, tools());

        let summary = runner.run(&config("false")).unwrap();
        assert!(matches!(
            summary,
            RunSummary::Completed {
                reporter_exit: 1,
                ..
            }
        ));
    }

    #[test]
    fn reporter_failure_propagates_when_fail_on_error_true() {
        let exec = ScriptedExecutor::with(vec![outcome(0, EMPTY_REPORT, ""), outcome(1, "", "")]);
        let runner = PipelineRunner::new(&exec, tools());

        let err = runner.run(&config("true")).unwrap_err();
        assert!(matches!(err, PipelineError::ReporterFailed { code: 1, .. }));
        assert_eq!(err.to_string(), "The process 'reviewdog' failed with exit code 1");
    }

    #[test]
    fn end_to_end_argument_vectors_and_payload() {
        let exec = ScriptedExecutor::with(vec![outcome(0, EMPTY_REPORT, ""), outcome(0, "", "")]);
        let runner = PipelineRunner::new(&exec, tools());

        let summary = runner.run(&config("true")).unwrap();
        assert_eq!(
            summary,
            RunSummary::Completed {
                linter_exit: 0,
                reporter_exit: 0,
                diagnostics: Some(Summary::default()),
            }
        );

        let calls = exec.calls();
        assert_eq!(calls[0].program, "vectorlint");
        assert_eq!(calls[0].args, vec!["--output", "rdjson", "doc.md"]);
        assert!(calls[0].capture_stdout);

        assert_eq!(calls[1].program, "reviewdog");
        assert_eq!(
            calls[1].args,
            vec![
                "-f=rdjson",
                "-name=lint",
                "-reporter=github-pr-check",
                "-filter-mode=added",
                "-fail-on-error=true"
            ]
        );
        assert_eq!(calls[1].input, Some(CapturedOutput::from(EMPTY_REPORT)));
    }

    #[test]
    fn unreadable_report_is_still_forwarded() {
        let exec = ScriptedExecutor::with(vec![outcome(0, "not json", ""), outcome(0, "", "")]);
        let runner = PipelineRunner::new(&exec, tools());

        let summary = runner.run(&config("true")).unwrap();
        assert!(matches!(
            summary,
            RunSummary::Completed {
                diagnostics: None,
                ..
            }
        ));
        assert_eq!(exec.calls()[1].input, Some(CapturedOutput::from("not json")));
    }

    #[test]
    fn spawn_failure_propagates() {
        struct Missing;
        impl Executor for Missing {
            fn execute(&self, invocation: Invocation) -> Result<ExitOutcome, ProcessError> {
                Err(ProcessError::Spawn {
                    program: invocation.program,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            }
        }

        let runner = PipelineRunner::new(Missing, tools());
        let err = runner.run(&config("false")).unwrap_err();
        assert!(matches!(err, PipelineError::Process(ProcessError::Spawn { .. })));
    }

    #[test]
    fn tool_env_is_scoped_per_invocation() {
        let mut linter_env = std::collections::BTreeMap::new();
        linter_env.insert("OPENAI_API_KEY".to_string(), "sk-test".to_string());
        let mut reporter_env = std::collections::BTreeMap::new();
        reporter_env.insert("REVIEWDOG_GITHUB_API_TOKEN".to_string(), "ghs".to_string());

        let tools = Toolchain {
            linter: ToolCommand::new("VectorLint", "vectorlint").with_env(linter_env),
            reporter: ToolCommand::new("reviewdog", "reviewdog").with_env(reporter_env),
        };
        let exec = ScriptedExecutor::with(vec![outcome(0, EMPTY_REPORT, ""), outcome(0, "", "")]);
        PipelineRunner::new(&exec, tools).run(&config("true")).unwrap();

        let calls = exec.calls();
        assert!(calls[0].env.contains_key("OPENAI_API_KEY"));
        assert!(!calls[0].env.contains_key("REVIEWDOG_GITHUB_API_TOKEN"));
        assert!(calls[1].env.contains_key("REVIEWDOG_GITHUB_API_TOKEN"));
        assert!(!calls[1].env.contains_key("OPENAI_API_KEY"));
    }
}
