use std::fmt;

use super::{Report, Severity};

/// Parse an rdjson document from the linter's raw stdout.
pub fn parse_report(raw: &[u8]) -> Result<Report, serde_json::Error> {
    serde_json::from_slice(raw)
}

/// Diagnostic counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub unknown: usize,
    /// Highest severity present; `None` for an empty report.
    pub worst: Option<Severity>,
}

impl Report {
    pub fn summary(&self) -> Summary {
        let report_default = self.severity.as_deref();
        let mut summary = Summary::default();

        for diagnostic in &self.diagnostics {
            summary.total += 1;
            match diagnostic.effective_severity(report_default) {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
                Severity::Unknown => summary.unknown += 1,
            }
        }

        summary.worst = self.worst_severity();
        summary
    }

    /// Highest severity present, if any diagnostics exist.
    pub fn worst_severity(&self) -> Option<Severity> {
        let report_default = self.severity.as_deref();
        self.diagnostics
            .iter()
            .map(|d| d.effective_severity(report_default))
            .max()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} diagnostics ({} errors, {} warnings, {} infos)",
            self.total, self.errors, self.warnings, self.infos
        )?;
        if self.unknown > 0 {
            write!(f, ", {} without severity", self.unknown)?;
        }
        if let Some(worst) = self.worst {
            write!(f, "; worst: {worst}")?;
        }
        Ok(())
    }
}
