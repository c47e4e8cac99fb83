// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const TITLE_DRIFT: &str = "Artifact Template Drift";
pub const TITLE_MISSING: &str = "Missing Template or Agent";

fn is_lower_kebab(input: &str) -> bool {
    !input.is_empty()
        && !input.starts_with('-')
        && !input.ends_with('-')
        && input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactKind(String);

impl ArtifactKind {
    pub fn parse(value: &str) -> Result<Self, String> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err("artifact kind cannot be empty".to_string());
        }
        if !is_lower_kebab(raw) {
            return Err(format!(
                "invalid artifact kind `{raw}`: expected lowercase kebab-case"
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required heading order plus the optional headings allowed after the anchor.
///
/// Only constructible through [`Schema::new`], so every instance satisfies:
/// at least one required heading, no blank or duplicated required heading,
/// and no heading that is both required and optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    required: Vec<String>,
    optional: Vec<String>,
}

impl Schema {
    pub fn new<R, O>(required: R, optional: O) -> Result<Self, String>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        let required = required.into_iter().map(Into::into).collect::<Vec<String>>();
        let optional = optional.into_iter().map(Into::into).collect::<Vec<String>>();

        if required.is_empty() {
            return Err("schema must declare at least one required heading".to_string());
        }
        let mut seen = BTreeSet::new();
        for heading in &required {
            if heading.trim().is_empty() {
                return Err("required heading cannot be empty".to_string());
            }
            if !seen.insert(heading.as_str()) {
                return Err(format!("required heading `{heading}` is duplicated"));
            }
        }
        let mut seen_optional = BTreeSet::new();
        for heading in &optional {
            if heading.trim().is_empty() {
                return Err("optional heading cannot be empty".to_string());
            }
            if seen.contains(heading.as_str()) {
                return Err(format!(
                    "heading `{heading}` cannot be both required and optional"
                ));
            }
            if !seen_optional.insert(heading.as_str()) {
                return Err(format!("optional heading `{heading}` is duplicated"));
            }
        }

        Ok(Self { required, optional })
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    pub fn anchor(&self) -> &str {
        // Non-empty by construction.
        self.required.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_required(&self, heading: &str) -> bool {
        self.required.iter().any(|h| h == heading)
    }

    pub fn is_recognized(&self, heading: &str) -> bool {
        self.is_required(heading) || self.optional.iter().any(|h| h == heading)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    #[default]
    Relaxed,
    Standard,
}

impl Strictness {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim() {
            "relaxed" => Ok(Self::Relaxed),
            "standard" => Ok(Self::Standard),
            other => Err(format!("invalid strictness `{other}`: expected relaxed or standard")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    StructuralMissing,
    StructuralOrder,
    StructuralExtra,
    StructuralMisplacedOptional,
    ReferenceMissing,
    SkeletonEmbedded,
    ResourceMissing,
    StandardsDriftHeuristic,
    ArtifactsAbsent,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StructuralMissing => "structural_missing",
            Self::StructuralOrder => "structural_order",
            Self::StructuralExtra => "structural_extra",
            Self::StructuralMisplacedOptional => "structural_misplaced_optional",
            Self::ReferenceMissing => "reference_missing",
            Self::SkeletonEmbedded => "skeleton_embedded",
            Self::ResourceMissing => "resource_missing",
            Self::StandardsDriftHeuristic => "standards_drift_heuristic",
            Self::ArtifactsAbsent => "artifacts_absent",
        }
    }

    /// Classification title used by annotation renderers.
    pub fn title(self) -> &'static str {
        match self {
            Self::ResourceMissing => TITLE_MISSING,
            _ => TITLE_DRIFT,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub hint: Option<String>,
    pub path: Option<String>,
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            title: code.title().to_string(),
            message: message.into(),
            hint: None,
            path: None,
            line: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }

    /// Attaches a file-level location (line 1).
    #[must_use]
    pub fn at_file(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self.line = Some(1);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Structural deviation of one document from its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnosis {
    Missing {
        headings: Vec<String>,
    },
    /// `before` belongs ahead of `after`; `position` is 1-based in schema order.
    OutOfOrder {
        before: String,
        after: String,
        position: usize,
    },
    Extra {
        headings: Vec<String>,
    },
    OptionalMisplaced {
        heading: String,
        anchor: String,
    },
}

impl Diagnosis {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::Missing { .. } => DiagnosticCode::StructuralMissing,
            Self::OutOfOrder { .. } => DiagnosticCode::StructuralOrder,
            Self::Extra { .. } => DiagnosticCode::StructuralExtra,
            Self::OptionalMisplaced { .. } => DiagnosticCode::StructuralMisplacedOptional,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    PassWithWarnings,
    Fail,
}

impl Outcome {
    pub fn from_flags(has_hard_failure: bool, has_warning: bool) -> Self {
        if has_hard_failure {
            Self::Fail
        } else if has_warning {
            Self::PassWithWarnings
        } else {
            Self::Pass
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::PassWithWarnings => "pass_with_warnings",
            Self::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub errors: u64,
    pub warnings: u64,
    pub artifacts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub repo_root: String,
    pub strictness: Strictness,
    pub artifacts: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: RunSummary,
    pub outcome: Outcome,
}

pub fn report_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "artifact-lint run report",
        "type": "object",
        "required": ["repo_root", "strictness", "artifacts", "diagnostics", "summary", "outcome"],
        "properties": {
            "repo_root": {"type": "string"},
            "strictness": {"enum": ["relaxed", "standard"]},
            "artifacts": {"type": "array", "items": {"type": "string"}},
            "diagnostics": {"type": "array"},
            "summary": {"type": "object"},
            "outcome": {"enum": ["pass", "pass_with_warnings", "fail"]}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_kind_validation() {
        assert!(ArtifactKind::parse("architecture-assessment").is_ok());
        assert!(ArtifactKind::parse("Architecture").is_err());
        assert!(ArtifactKind::parse("-plan").is_err());
        assert!(ArtifactKind::parse("deployment_summary").is_err());
        assert!(ArtifactKind::parse("  ").is_err());
    }

    #[test]
    fn schema_rejects_broken_invariants() {
        assert!(Schema::new(Vec::<String>::new(), Vec::<String>::new()).is_err());
        assert!(Schema::new(["## A", "## A"], Vec::<String>::new()).is_err());
        assert!(Schema::new(["## A", " "], Vec::<String>::new()).is_err());
        assert!(Schema::new(["## A", "## B"], ["## B"]).is_err());
        assert!(Schema::new(["## A"], ["## C", "## C"]).is_err());
    }

    #[test]
    fn schema_anchor_is_last_required() {
        let schema = Schema::new(["## Overview", "## Details", "## Done"], ["## Notes"])
            .expect("schema");
        assert_eq!(schema.anchor(), "## Done");
        assert!(schema.is_required("## Details"));
        assert!(!schema.is_required("## Notes"));
        assert!(schema.is_recognized("## Notes"));
        assert!(!schema.is_recognized("## Extra"));
    }

    #[test]
    fn strictness_parse_and_default() {
        assert_eq!(Strictness::default(), Strictness::Relaxed);
        assert_eq!(Strictness::parse("standard"), Ok(Strictness::Standard));
        assert!(Strictness::parse("strict").is_err());
    }

    #[test]
    fn outcome_from_flags() {
        assert_eq!(Outcome::from_flags(true, true), Outcome::Fail);
        assert_eq!(Outcome::from_flags(false, true), Outcome::PassWithWarnings);
        assert_eq!(Outcome::from_flags(false, false), Outcome::Pass);
    }

    #[test]
    fn resource_codes_use_missing_title() {
        assert_eq!(DiagnosticCode::ResourceMissing.title(), TITLE_MISSING);
        assert_eq!(DiagnosticCode::StructuralOrder.title(), TITLE_DRIFT);
        let diag = Diagnostic::warning(DiagnosticCode::ResourceMissing, "gone").at_file("a.md");
        assert_eq!(diag.title, TITLE_MISSING);
        assert_eq!(diag.line, Some(1));
        let retitled = diag.with_title(TITLE_DRIFT);
        assert_eq!(retitled.code, DiagnosticCode::ResourceMissing);
        assert_eq!(retitled.title, TITLE_DRIFT);
    }

    #[test]
    fn report_schema_contains_required_fields() {
        let schema = report_json_schema();
        let required_text = schema
            .get("required")
            .map(Value::to_string)
            .unwrap_or_default();
        assert!(required_text.contains("diagnostics"));
        assert!(required_text.contains("outcome"));
        assert!(required_text.contains("strictness"));
    }
}
