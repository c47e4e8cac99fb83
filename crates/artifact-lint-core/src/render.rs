// SPDX-License-Identifier: Apache-2.0

use artifact_lint_model::{Diagnostic, Outcome, RunReport};

/// Escapes a value for the GitHub workflow-command protocol.
pub fn escape_annotation_value(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn annotation(diagnostic: &Diagnostic) -> String {
    let mut props = Vec::new();
    if let Some(path) = &diagnostic.path {
        props.push(format!("file={path}"));
    }
    if let Some(line) = diagnostic.line {
        props.push(format!("line={line}"));
    }
    props.push(format!("title={}", escape_annotation_value(&diagnostic.title)));
    format!(
        "::{} {}::{}",
        diagnostic.severity.as_str(),
        props.join(","),
        escape_annotation_value(&diagnostic.message)
    )
}

pub fn verdict_line(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Fail => "Validation FAILED - hard failures detected",
        Outcome::PassWithWarnings => "Validation passed with warnings",
        Outcome::Pass => "Validation passed - no issues detected",
    }
}

fn summary_line(report: &RunReport) -> String {
    format!(
        "summary: errors={} warnings={} artifacts={} strictness={} outcome={}",
        report.summary.errors,
        report.summary.warnings,
        report.summary.artifacts,
        report.strictness,
        report.outcome.as_str()
    )
}

pub fn render_github(report: &RunReport) -> String {
    let mut lines = report.diagnostics.iter().map(annotation).collect::<Vec<_>>();
    lines.push(summary_line(report));
    lines.push(verdict_line(report.outcome).to_string());
    lines.join("\n")
}

pub fn render_text(report: &RunReport) -> String {
    let mut lines = Vec::new();
    for diagnostic in &report.diagnostics {
        let location = match (&diagnostic.path, diagnostic.line) {
            (Some(path), Some(line)) => format!(" ({path}:{line})"),
            (Some(path), None) => format!(" ({path})"),
            _ => String::new(),
        };
        lines.push(format!(
            "[{}] {}: {}{location}",
            diagnostic.severity.as_str(),
            diagnostic.title,
            diagnostic.message
        ));
        if let Some(hint) = &diagnostic.hint {
            lines.push(format!("  hint: {hint}"));
        }
    }
    lines.push(summary_line(report));
    lines.push(verdict_line(report.outcome).to_string());
    lines.join("\n")
}

pub fn render_json(report: &RunReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| err.to_string())
}

pub fn exit_code_for_report(report: &RunReport) -> i32 {
    match report.outcome {
        Outcome::Fail => 1,
        Outcome::PassWithWarnings | Outcome::Pass => 0,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use artifact_lint_model::{DiagnosticCode, RunSummary, Strictness};

    fn report(diagnostics: Vec<Diagnostic>, outcome: Outcome) -> RunReport {
        RunReport {
            repo_root: ".".to_string(),
            strictness: Strictness::Relaxed,
            artifacts: Vec::new(),
            summary: RunSummary {
                errors: 1,
                warnings: 0,
                artifacts: 0,
            },
            diagnostics,
            outcome,
        }
    }

    #[test]
    fn annotation_values_are_escaped() {
        assert_eq!(escape_annotation_value("50%\r\nnext"), "50%25%0D%0Anext");
    }

    #[test]
    fn github_rendering_emits_workflow_commands() {
        let diag = Diagnostic::error(DiagnosticCode::ResourceMissing, "Missing agent file: a.md")
            .at_file("a.md");
        let text = render_github(&report(vec![diag], Outcome::Fail));
        let first = text.lines().next().expect("line");
        assert_eq!(
            first,
            "::error file=a.md,line=1,title=Missing Template or Agent::Missing agent file: a.md"
        );
        assert!(text.ends_with("Validation FAILED - hard failures detected"));
    }

    #[test]
    fn annotation_without_location_keeps_title() {
        let diag = Diagnostic::warning(DiagnosticCode::ArtifactsAbsent, "none");
        assert_eq!(
            annotation(&diag),
            "::warning title=Artifact Template Drift::none"
        );
    }

    #[test]
    fn text_rendering_includes_hint_and_summary() {
        let diag = Diagnostic::warning(DiagnosticCode::StructuralExtra, "extra")
            .at_file("t.md")
            .with_hint("move it");
        let text = render_text(&report(vec![diag], Outcome::PassWithWarnings));
        assert!(text.contains("[warning] Artifact Template Drift: extra (t.md:1)"));
        assert!(text.contains("  hint: move it"));
        assert!(text.contains("outcome=pass_with_warnings"));
    }

    #[test]
    fn json_rendering_is_structured() {
        let diag = Diagnostic::error(DiagnosticCode::StructuralOrder, "order").at_file("t.md");
        let json = render_json(&report(vec![diag], Outcome::Fail)).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["outcome"], "fail");
        assert_eq!(value["diagnostics"][0]["code"], "structural_order");
        assert_eq!(value["diagnostics"][0]["severity"], "error");
    }

    #[test]
    fn exit_code_tracks_hard_failures_only() {
        assert_eq!(exit_code_for_report(&report(Vec::new(), Outcome::Fail)), 1);
        assert_eq!(
            exit_code_for_report(&report(Vec::new(), Outcome::PassWithWarnings)),
            0
        );
        assert_eq!(exit_code_for_report(&report(Vec::new(), Outcome::Pass)), 0);
    }
}
