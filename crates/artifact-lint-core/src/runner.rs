// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use artifact_lint_adapters::{display_path, Fs, Walk};
use artifact_lint_model::{
    ArtifactKind, Diagnostic, DiagnosticCode, RunReport, Strictness, TITLE_DRIFT,
};
use tracing::{debug, info, info_span};

use crate::catalog::Catalog;
use crate::checks::{
    check_agent_link, check_artifact, check_embedded_skeleton, check_standards_reference,
    check_template, match_artifacts,
};
use crate::sink::ValidationRun;

#[derive(Debug, Clone)]
pub struct LintRequest {
    pub repo_root: PathBuf,
    pub strictness: Strictness,
}

fn missing_resource(what: &str, path: &Path) -> Diagnostic {
    let path = display_path(path);
    let diagnostic = Diagnostic::error(
        DiagnosticCode::ResourceMissing,
        format!("Missing {what} file: {path}"),
    )
    .at_file(path);
    // A template that does not exist is drift of the template set itself.
    if what == "template" {
        diagnostic.with_title(TITLE_DRIFT)
    } else {
        diagnostic
    }
}

fn read_or_report(
    fs: &dyn Fs,
    repo_root: &Path,
    path: &Path,
    what: &str,
    run: &mut ValidationRun,
) -> Option<String> {
    if !fs.exists(repo_root, path) {
        run.emit(missing_resource(what, path));
        return None;
    }
    match fs.read_text(repo_root, path) {
        Ok(text) => Some(text),
        Err(err) => {
            let shown = display_path(path);
            run.emit(
                Diagnostic::error(
                    DiagnosticCode::ResourceMissing,
                    format!("Unreadable {what} file: {shown} ({err})"),
                )
                .at_file(shown),
            );
            None
        }
    }
}

fn validate_templates(fs: &dyn Fs, catalog: &Catalog, repo_root: &Path, run: &mut ValidationRun) {
    for spec in &catalog.artifacts {
        debug!(kind = %spec.kind, template = %spec.template.display(), "template");
        if let Some(text) = read_or_report(fs, repo_root, &spec.template, "template", run) {
            run.extend(check_template(&text, spec));
        }
    }
}

fn load_agents(
    fs: &dyn Fs,
    catalog: &Catalog,
    repo_root: &Path,
    run: &mut ValidationRun,
) -> BTreeMap<ArtifactKind, String> {
    let mut agents = BTreeMap::new();
    for spec in &catalog.artifacts {
        let Some(agent) = spec.agent.as_deref() else {
            debug!(kind = %spec.kind, "no agent declared");
            continue;
        };
        if let Some(text) = read_or_report(fs, repo_root, agent, "agent", run) {
            run.extend(check_agent_link(agent, &text, &spec.template));
            agents.insert(spec.kind.clone(), text);
        }
    }
    agents
}

fn validate_skeletons(
    catalog: &Catalog,
    agents: &BTreeMap<ArtifactKind, String>,
    run: &mut ValidationRun,
) {
    for spec in &catalog.artifacts {
        if let (Some(agent), Some(text)) = (spec.agent.as_deref(), agents.get(&spec.kind)) {
            run.extend(check_embedded_skeleton(agent, text, spec));
        }
    }
}

fn validate_standards(fs: &dyn Fs, catalog: &Catalog, repo_root: &Path, run: &mut ValidationRun) {
    let path = catalog.standards_doc.as_path();
    if !fs.exists(repo_root, path) {
        run.extend(check_standards_reference(path, None));
        return;
    }
    match fs.read_text(repo_root, path) {
        Ok(text) => run.extend(check_standards_reference(path, Some(&text))),
        Err(err) => {
            let shown = display_path(path);
            run.emit(
                Diagnostic::warning(
                    DiagnosticCode::ResourceMissing,
                    format!("Unreadable standards file: {shown} ({err})"),
                )
                .at_file(shown),
            );
        }
    }
}

fn validate_artifacts(
    fs: &dyn Fs,
    walk: &dyn Walk,
    catalog: &Catalog,
    request: &LintRequest,
    run: &mut ValidationRun,
) -> Vec<String> {
    let repo_root = request.repo_root.as_path();
    let files = match walk.walk_files(repo_root, &catalog.output_root) {
        Ok(files) => files,
        Err(err) => {
            run.emit(
                Diagnostic::error(
                    DiagnosticCode::ResourceMissing,
                    format!("Failed to scan {}: {err}", display_path(&catalog.output_root)),
                )
                .at_file(display_path(&catalog.output_root)),
            );
            return Vec::new();
        }
    };

    let matched = match_artifacts(catalog, &files);
    if matched.is_empty() {
        run.emit(Diagnostic::warning(
            DiagnosticCode::ArtifactsAbsent,
            format!(
                "No artifacts found in {}/ (expected for new workflow).",
                display_path(&catalog.output_root)
            ),
        ));
        return Vec::new();
    }
    info!(count = matched.len(), "artifacts discovered");

    let mut scanned = Vec::new();
    for (path, spec) in matched {
        if !fs.exists(repo_root, &path) {
            debug!(path = %path.display(), "artifact vanished before validation");
            continue;
        }
        debug!(path = %path.display(), kind = %spec.kind, "artifact");
        if let Some(text) = read_or_report(fs, repo_root, &path, "artifact", run) {
            run.extend(check_artifact(&path, &text, spec, request.strictness));
        }
        scanned.push(display_path(&path));
    }
    scanned
}

/// Runs every check against the repository and returns the finished report.
/// Findings never abort the run; each step contributes to the same accumulator.
pub fn run_lint(
    fs: &dyn Fs,
    walk: &dyn Walk,
    catalog: &Catalog,
    request: &LintRequest,
) -> RunReport {
    let span = info_span!("artifact_lint", strictness = %request.strictness);
    let _guard = span.enter();
    let repo_root = request.repo_root.as_path();
    let mut run = ValidationRun::new();

    info!(step = 1, "validating templates");
    validate_templates(fs, catalog, repo_root, &mut run);

    info!(step = 2, "validating agent links");
    let agents = load_agents(fs, catalog, repo_root, &mut run);

    info!(step = 3, "checking for embedded skeletons");
    validate_skeletons(catalog, &agents, &mut run);

    info!(step = 4, "validating standards documentation");
    validate_standards(fs, catalog, repo_root, &mut run);

    info!(step = 5, "validating artifacts");
    let artifacts = validate_artifacts(fs, walk, catalog, request, &mut run);

    info!(
        hard_failure = run.has_hard_failure(),
        warning = run.has_warning(),
        diagnostics = run.diagnostics().len(),
        "run complete"
    );
    run.finish(repo_root.display().to_string(), request.strictness, artifacts)
}
