// SPDX-License-Identifier: Apache-2.0

//! Document checks. Each check works on text already read by the runner and
//! returns its diagnostics instead of recording them.

use std::path::{Path, PathBuf};

use artifact_lint_adapters::{display_path, relative_path};
use artifact_lint_model::{Diagnosis, Diagnostic, DiagnosticCode, Strictness};

use crate::catalog::{ArtifactSpec, Catalog};
use crate::compare::{compare_artifact, compare_template};
use crate::markdown::{extract_fenced_blocks, extract_h2_headings};
use crate::policy::{severity_for, DocumentRole};

/// Required headings inside one fenced block that count as an embedded skeleton.
pub const SKELETON_THRESHOLD: usize = 3;

const STANDARDS_MARKERS: [&str; 2] = ["template", ".template.md"];

fn describe(path: &str, diagnosis: &Diagnosis, role: DocumentRole) -> String {
    let label = match role {
        DocumentRole::Template => "Template",
        DocumentRole::Artifact(_) => "Artifact",
    };
    match (diagnosis, role) {
        (Diagnosis::Missing { headings }, _) => format!(
            "{label} {path} is missing required H2 headings: {}",
            headings.join(", ")
        ),
        (
            Diagnosis::OutOfOrder {
                before,
                after,
                position,
            },
            DocumentRole::Template,
        ) => format!(
            "{label} {path} has headings out of order. Expected '{before}' at position {position}, found '{after}'."
        ),
        (Diagnosis::OutOfOrder { before, after, .. }, DocumentRole::Artifact(_)) => format!(
            "{label} {path} has required headings out of order: '{before}' should come before '{after}'."
        ),
        (Diagnosis::Extra { headings }, _) => format!(
            "{label} {path} contains extra H2 headings: {}",
            headings.join(", ")
        ),
        (Diagnosis::OptionalMisplaced { heading, anchor }, _) => format!(
            "{label} {path} has optional heading '{heading}' before anchor '{anchor}' (consider moving it)."
        ),
    }
}

fn hint(diagnosis: &Diagnosis, template: &str) -> String {
    match diagnosis {
        Diagnosis::Missing { .. } => format!("copy the missing sections from {template}"),
        Diagnosis::OutOfOrder { .. } => format!("reorder sections to follow {template}"),
        Diagnosis::Extra { .. } => {
            "move supplementary content under an existing section or an H3".to_string()
        }
        Diagnosis::OptionalMisplaced { anchor, .. } => {
            format!("optional sections belong after '{anchor}'")
        }
    }
}

fn structural(
    path: &str,
    template: &str,
    diagnoses: Vec<Diagnosis>,
    role: DocumentRole,
) -> Vec<Diagnostic> {
    diagnoses
        .into_iter()
        .filter_map(|diagnosis| {
            let severity = severity_for(&diagnosis, role)?;
            Some(
                Diagnostic::new(diagnosis.code(), severity, describe(path, &diagnosis, role))
                    .at_file(path)
                    .with_hint(hint(&diagnosis, template)),
            )
        })
        .collect()
}

/// Strict structural check of a canonical template.
pub fn check_template(text: &str, spec: &ArtifactSpec) -> Vec<Diagnostic> {
    let path = display_path(&spec.template);
    let headings = extract_h2_headings(text);
    structural(
        &path,
        &path,
        compare_template(&headings, &spec.schema),
        DocumentRole::Template,
    )
}

/// Structural check of one generated artifact under `strictness`.
pub fn check_artifact(
    path: &Path,
    text: &str,
    spec: &ArtifactSpec,
    strictness: Strictness,
) -> Vec<Diagnostic> {
    let headings = extract_h2_headings(text);
    structural(
        &display_path(path),
        &display_path(&spec.template),
        compare_artifact(&headings, &spec.schema),
        DocumentRole::Artifact(strictness),
    )
}

/// The agent document must mention its template by a path relative to itself.
pub fn check_agent_link(agent: &Path, agent_text: &str, template: &Path) -> Option<Diagnostic> {
    let from_dir = agent.parent().unwrap_or_else(|| Path::new(""));
    let expected = relative_path(from_dir, template);
    if agent_text.contains(&expected) {
        return None;
    }
    let agent = display_path(agent);
    Some(
        Diagnostic::error(
            DiagnosticCode::ReferenceMissing,
            format!("Agent {agent} must reference template {expected}"),
        )
        .at_file(agent)
        .with_hint(format!("link `{expected}` instead of restating its structure")),
    )
}

/// Flags the first fenced block that reproduces the template skeleton.
pub fn check_embedded_skeleton(
    agent: &Path,
    agent_text: &str,
    spec: &ArtifactSpec,
) -> Option<Diagnostic> {
    let count = extract_fenced_blocks(agent_text)
        .iter()
        .map(|block| {
            spec.schema
                .required()
                .iter()
                .filter(|heading| block.contains(heading.as_str()))
                .count()
        })
        .find(|count| *count >= SKELETON_THRESHOLD)?;
    let agent = display_path(agent);
    Some(
        Diagnostic::error(
            DiagnosticCode::SkeletonEmbedded,
            format!(
                "Agent {agent} appears to embed a {} skeleton (found {count} headings in a fenced block).",
                spec.file_name
            ),
        )
        .at_file(agent)
        .with_hint(format!(
            "reference {} instead of copying its headings",
            display_path(&spec.template)
        )),
    )
}

/// Weak heuristic: the standards document should talk about templates at all.
/// `text` is `None` when the document does not exist.
pub fn check_standards_reference(path: &Path, text: Option<&str>) -> Option<Diagnostic> {
    let path = display_path(path);
    match text {
        None => Some(
            Diagnostic::warning(
                DiagnosticCode::ResourceMissing,
                format!("Standards file not found: {path}"),
            )
            .at_file(path),
        ),
        Some(text) if !STANDARDS_MARKERS.iter().any(|m| text.contains(m)) => Some(
            Diagnostic::warning(
                DiagnosticCode::StandardsDriftHeuristic,
                format!("Standards file {path} should reference template-first approach"),
            )
            .at_file(path)
            .with_hint("point authors at the .template.md files"),
        ),
        Some(_) => None,
    }
}

/// Pairs discovered files with the artifact kind their file name selects.
pub fn match_artifacts<'a>(
    catalog: &'a Catalog,
    files: &[PathBuf],
) -> Vec<(PathBuf, &'a ArtifactSpec)> {
    files
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            catalog
                .artifact_for_file(name)
                .map(|spec| (path.clone(), spec))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use artifact_lint_model::Severity;

    fn catalog() -> Catalog {
        Catalog::builtin().expect("builtin")
    }

    fn requirements() -> ArtifactSpec {
        catalog().artifacts[0].clone()
    }

    fn render(headings: &[String]) -> String {
        headings
            .iter()
            .map(|h| format!("{h}\n\nbody\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn complete_template_passes() {
        let spec = requirements();
        let text = format!("# Requirements\n\n{}", render(spec.schema.required()));
        assert!(check_template(&text, &spec).is_empty());
    }

    #[test]
    fn stray_fence_opener_does_not_hide_template_headings() {
        let spec = requirements();
        let (first, rest) = spec.schema.required().split_at(1);
        let text = format!("{}\nRun:\n\n```bash\n\n{}", render(first), render(rest));
        assert!(check_template(&text, &spec).is_empty());
    }

    #[test]
    fn template_missing_heading_is_error() {
        let spec = requirements();
        let text = render(&spec.schema.required()[1..]);
        let found = check_template(&text, &spec);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, DiagnosticCode::StructuralMissing);
        assert_eq!(found[0].severity, Severity::Error);
        assert!(found[0].message.contains("## Project Overview"));
        assert_eq!(
            found[0].path.as_deref(),
            Some(".github/templates/01-requirements.template.md")
        );
    }

    #[test]
    fn artifact_missing_heading_depends_on_strictness() {
        let spec = requirements();
        let text = render(&spec.schema.required()[..6]);
        let relaxed = check_artifact(
            Path::new("agent-output/demo/01-requirements.md"),
            &text,
            &spec,
            Strictness::Relaxed,
        );
        assert_eq!(relaxed.len(), 1);
        assert_eq!(relaxed[0].severity, Severity::Warning);

        let standard = check_artifact(
            Path::new("agent-output/demo/01-requirements.md"),
            &text,
            &spec,
            Strictness::Standard,
        );
        assert_eq!(standard.len(), 1);
        assert_eq!(standard[0].severity, Severity::Error);
        assert!(standard[0].message.starts_with("Artifact agent-output/demo/01-requirements.md"));
    }

    #[test]
    fn artifact_extras_reported_only_in_standard_mode() {
        let spec = requirements();
        let mut headings = spec.schema.required().to_vec();
        headings.push("## Appendix".to_string());
        let text = render(&headings);
        let path = Path::new("agent-output/01-requirements.md");
        assert!(check_artifact(path, &text, &spec, Strictness::Relaxed).is_empty());
        let standard = check_artifact(path, &text, &spec, Strictness::Standard);
        assert_eq!(standard.len(), 1);
        assert_eq!(standard[0].code, DiagnosticCode::StructuralExtra);
        assert_eq!(standard[0].severity, Severity::Warning);
    }

    #[test]
    fn agent_link_uses_path_relative_to_agent() {
        let spec = requirements();
        let agent = spec.agent.clone().expect("agent");
        let good = "Use [the template](../templates/01-requirements.template.md).";
        assert!(check_agent_link(&agent, good, &spec.template).is_none());

        let bad = "Use .github/templates/01-requirements.template.md";
        let found = check_agent_link(&agent, bad, &spec.template).expect("missing link");
        assert_eq!(found.code, DiagnosticCode::ReferenceMissing);
        assert_eq!(found.severity, Severity::Error);
        assert!(found.message.contains("../templates/01-requirements.template.md"));
    }

    #[test]
    fn skeleton_threshold_is_three_headings_in_one_block() {
        let spec = requirements();
        let agent = Path::new(".github/agents/project-planner.agent.md");
        let two = format!(
            "```markdown\n{}\n{}\n```\n```\n{}\n```\n",
            spec.schema.required()[0],
            spec.schema.required()[1],
            spec.schema.required()[2]
        );
        assert!(check_embedded_skeleton(agent, &two, &spec).is_none());

        let three = format!(
            "```markdown\n{}\n{}\n{}\n```\n",
            spec.schema.required()[0],
            spec.schema.required()[1],
            spec.schema.required()[2]
        );
        let found = check_embedded_skeleton(agent, &three, &spec).expect("skeleton");
        assert_eq!(found.code, DiagnosticCode::SkeletonEmbedded);
        assert!(found.message.contains("found 3 headings"));
    }

    #[test]
    fn standards_reference_is_a_warning_heuristic() {
        let path = Path::new(".github/instructions/markdown.instructions.md");
        let missing = check_standards_reference(path, None).expect("missing");
        assert_eq!(missing.code, DiagnosticCode::ResourceMissing);
        assert_eq!(missing.severity, Severity::Warning);

        let drift = check_standards_reference(path, Some("# Markdown rules")).expect("drift");
        assert_eq!(drift.code, DiagnosticCode::StandardsDriftHeuristic);
        assert_eq!(drift.severity, Severity::Warning);

        assert!(check_standards_reference(path, Some("Start from the template.")).is_none());
    }

    #[test]
    fn match_artifacts_selects_by_suffix() {
        let catalog = catalog();
        let files = vec![
            PathBuf::from("agent-output/a/01-requirements.md"),
            PathBuf::from("agent-output/a/03-des-diagram.py"),
            PathBuf::from("agent-output/b/06-deployment-summary.md"),
        ];
        let matched = match_artifacts(&catalog, &files);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].1.kind.as_str(), "requirements");
        assert_eq!(matched[1].1.kind.as_str(), "deployment-summary");
    }
}
