// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use artifact_lint_adapters::{display_path, Fs};
use artifact_lint_model::{ArtifactKind, Schema};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_ROOT: &str = "agent-output";
pub const DEFAULT_STANDARDS_DOC: &str = ".github/instructions/markdown.instructions.md";

const BUILTIN_CATALOG: &str = r###"
[[artifacts]]
kind = "requirements"
file_name = "01-requirements.md"
template = ".github/templates/01-requirements.template.md"
agent = ".github/agents/project-planner.agent.md"
required = [
  "## Project Overview",
  "## Functional Requirements",
  "## Non-Functional Requirements (NFRs)",
  "## Compliance & Security Requirements",
  "## Cost Constraints",
  "## Operational Requirements",
  "## Regional Preferences",
]
optional = ["## Summary for Architecture Assessment"]

[[artifacts]]
kind = "architecture-assessment"
file_name = "02-architecture-assessment.md"
template = ".github/templates/02-architecture-assessment.template.md"
agent = ".github/agents/azure-principal-architect.agent.md"
required = [
  "## Requirements Validation ✅",
  "## Executive Summary",
  "## WAF Pillar Assessment",
  "## Resource SKU Recommendations",
  "## Architecture Decision Summary",
  "## Implementation Handoff",
  "## Approval Gate",
]

[[artifacts]]
kind = "implementation-plan"
file_name = "04-implementation-plan.md"
template = ".github/templates/04-implementation-plan.template.md"
agent = ".github/agents/bicep-plan.agent.md"
required = [
  "## Overview",
  "## Resource Inventory",
  "## Module Structure",
  "## Implementation Tasks",
  "## Dependency Graph",
  "## Naming Conventions",
  "## Security Configuration",
  "## Estimated Implementation Time",
  "## Approval Gate",
]

[[artifacts]]
kind = "deployment-summary"
file_name = "06-deployment-summary.md"
template = ".github/templates/06-deployment-summary.template.md"
required = [
  "## Deployment Details",
  "## Deployed Resources",
  "## Outputs (Expected)",
  "## To Actually Deploy",
  "## Post-Deployment Tasks",
]
"###;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {detail}")]
    Read { path: String, detail: String },
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    #[error("invalid catalog: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl CatalogError {
    /// Every individual problem, for doctor-style listings.
    pub fn problems(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub template: PathBuf,
    pub agent: Option<PathBuf>,
    pub schema: Schema,
}

/// Immutable per-kind lookup table built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub output_root: PathBuf,
    pub standards_doc: PathBuf,
    pub artifacts: Vec<ArtifactSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    output_root: Option<String>,
    standards_doc: Option<String>,
    artifacts: Vec<RawArtifact>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArtifact {
    kind: String,
    file_name: String,
    template: String,
    agent: Option<String>,
    required: Vec<String>,
    #[serde(default)]
    optional: Vec<String>,
}

fn non_empty_path(owner: &str, field: &str, raw: &str) -> Result<PathBuf, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(format!("{owner}: {field} cannot be empty"))
    } else {
        Ok(PathBuf::from(trimmed))
    }
}

fn validate_artifact(raw: RawArtifact, index: usize) -> Result<ArtifactSpec, Vec<String>> {
    let owner = if raw.kind.trim().is_empty() {
        format!("artifacts[{index}]")
    } else {
        raw.kind.trim().to_string()
    };
    let mut errors = Vec::new();

    let kind = ArtifactKind::parse(&raw.kind).map_err(|e| errors.push(format!("{owner}: {e}")));
    let file_name = raw.file_name.trim().to_string();
    if file_name.is_empty() || file_name.contains('/') {
        errors.push(format!("{owner}: file_name must be a bare, non-empty file name"));
    }
    let template = non_empty_path(&owner, "template", &raw.template).map_err(|e| errors.push(e));
    let agent = match raw.agent.as_deref() {
        Some(agent) => non_empty_path(&owner, "agent", agent)
            .map(Some)
            .map_err(|e| errors.push(e)),
        None => Ok(None),
    };
    let schema = Schema::new(raw.required, raw.optional)
        .map_err(|e| errors.push(format!("{owner}: {e}")));

    match (kind, template, agent, schema) {
        (Ok(kind), Ok(template), Ok(agent), Ok(schema)) if errors.is_empty() => {
            Ok(ArtifactSpec {
                kind,
                file_name,
                template,
                agent,
                schema,
            })
        }
        _ => Err(errors),
    }
}

/// Parses and validates a TOML catalog, collecting every problem found.
pub fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    let raw: RawCatalog =
        toml::from_str(text).map_err(|err| CatalogError::Parse(err.to_string()))?;

    let mut errors = Vec::new();
    if raw.artifacts.is_empty() {
        errors.push("catalog must declare at least one artifact".to_string());
    }

    let mut artifacts = Vec::new();
    for (index, row) in raw.artifacts.into_iter().enumerate() {
        match validate_artifact(row, index) {
            Ok(spec) => artifacts.push(spec),
            Err(mut problems) => errors.append(&mut problems),
        }
    }

    let mut kinds = BTreeSet::new();
    let mut file_names = BTreeSet::new();
    for spec in &artifacts {
        if !kinds.insert(spec.kind.clone()) {
            errors.push(format!("duplicate artifact kind `{}`", spec.kind));
        }
        if !file_names.insert(spec.file_name.clone()) {
            errors.push(format!("duplicate artifact file_name `{}`", spec.file_name));
        }
    }

    let output_root = non_empty_path(
        "catalog",
        "output_root",
        raw.output_root.as_deref().unwrap_or(DEFAULT_OUTPUT_ROOT),
    )
    .map_err(|e| errors.push(e));
    let standards_doc = non_empty_path(
        "catalog",
        "standards_doc",
        raw.standards_doc.as_deref().unwrap_or(DEFAULT_STANDARDS_DOC),
    )
    .map_err(|e| errors.push(e));

    match (output_root, standards_doc) {
        (Ok(output_root), Ok(standards_doc)) if errors.is_empty() => Ok(Catalog {
            output_root,
            standards_doc,
            artifacts,
        }),
        _ => Err(CatalogError::Invalid(errors)),
    }
}

pub fn load_catalog(fs: &dyn Fs, repo_root: &Path, path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs
        .read_text(repo_root, path)
        .map_err(|err| CatalogError::Read {
            path: display_path(path),
            detail: err.to_string(),
        })?;
    parse_catalog(&text)
}

/// Problems found in a catalog file; empty when the catalog is usable.
pub fn catalog_doctor(fs: &dyn Fs, repo_root: &Path, path: &Path) -> Vec<String> {
    match load_catalog(fs, repo_root, path) {
        Ok(_) => Vec::new(),
        Err(err) => err.problems(),
    }
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        parse_catalog(BUILTIN_CATALOG)
    }

    /// First artifact kind whose file name is a suffix of `file_name`.
    pub fn artifact_for_file(&self, file_name: &str) -> Option<&ArtifactSpec> {
        self.artifacts
            .iter()
            .find(|spec| file_name.ends_with(spec.file_name.as_str()))
    }
}

pub fn render_catalog_text(catalog: &Catalog) -> String {
    let mut lines = vec![
        format!("output_root: {}", display_path(&catalog.output_root)),
        format!("standards_doc: {}", display_path(&catalog.standards_doc)),
    ];
    for spec in &catalog.artifacts {
        lines.push(format!("kind: {} ({})", spec.kind, spec.file_name));
        lines.push(format!("  template: {}", display_path(&spec.template)));
        lines.push(format!(
            "  agent: {}",
            spec.agent
                .as_deref()
                .map(display_path)
                .unwrap_or_else(|| "-".to_string())
        ));
        lines.push(format!("  anchor: {}", spec.schema.anchor()));
        for heading in spec.schema.required() {
            lines.push(format!("  required: {heading}"));
        }
        for heading in spec.schema.optional() {
            lines.push(format!("  optional: {heading}"));
        }
    }
    lines.join("\n")
}
