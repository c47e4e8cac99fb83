// SPDX-License-Identifier: Apache-2.0

use artifact_lint_model::{Diagnostic, Outcome, RunReport, RunSummary, Severity, Strictness};
use tracing::debug;

/// Accumulator for one lint run. Flags only ever move from false to true.
#[derive(Debug, Default)]
pub struct ValidationRun {
    diagnostics: Vec<Diagnostic>,
    has_hard_failure: bool,
    has_warning: bool,
}

impl ValidationRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug!(
            code = %diagnostic.code,
            severity = diagnostic.severity.as_str(),
            path = diagnostic.path.as_deref().unwrap_or("-"),
            "diagnostic"
        );
        match diagnostic.severity {
            Severity::Error => self.has_hard_failure = true,
            Severity::Warning => self.has_warning = true,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    pub fn has_hard_failure(&self) -> bool {
        self.has_hard_failure
    }

    pub fn has_warning(&self) -> bool {
        self.has_warning
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_flags(self.has_hard_failure, self.has_warning)
    }

    pub fn finish(
        self,
        repo_root: String,
        strictness: Strictness,
        artifacts: Vec<String>,
    ) -> RunReport {
        let outcome = self.outcome();
        let summary = RunSummary {
            errors: self
                .diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .count() as u64,
            warnings: self
                .diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Warning)
                .count() as u64,
            artifacts: artifacts.len() as u64,
        };
        RunReport {
            repo_root,
            strictness,
            artifacts,
            diagnostics: self.diagnostics,
            summary,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_lint_model::DiagnosticCode;

    #[test]
    fn flags_are_monotonic() {
        let mut run = ValidationRun::new();
        assert_eq!(run.outcome(), Outcome::Pass);

        run.emit(Diagnostic::warning(DiagnosticCode::StructuralExtra, "extra"));
        assert!(run.has_warning());
        assert!(!run.has_hard_failure());
        assert_eq!(run.outcome(), Outcome::PassWithWarnings);

        run.emit(Diagnostic::error(DiagnosticCode::StructuralOrder, "order"));
        run.emit(Diagnostic::warning(DiagnosticCode::StructuralExtra, "again"));
        assert!(run.has_hard_failure());
        assert!(run.has_warning());
        assert_eq!(run.outcome(), Outcome::Fail);
        assert_eq!(run.diagnostics().len(), 3);
    }

    #[test]
    fn finish_counts_by_severity() {
        let mut run = ValidationRun::new();
        run.extend([
            Diagnostic::error(DiagnosticCode::ResourceMissing, "gone"),
            Diagnostic::warning(DiagnosticCode::ArtifactsAbsent, "none"),
            Diagnostic::warning(DiagnosticCode::StructuralExtra, "extra"),
        ]);
        let report = run.finish(".".to_string(), Strictness::Relaxed, vec!["a.md".to_string()]);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.summary.warnings, 2);
        assert_eq!(report.summary.artifacts, 1);
        assert_eq!(report.outcome, Outcome::Fail);
    }
}
