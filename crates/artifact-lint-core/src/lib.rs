// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Structural linting of Markdown templates, generated artifacts and the
//! authoring-agent documents that point at them.

pub mod catalog;
pub mod checks;
pub mod compare;
pub mod markdown;
pub mod policy;
pub mod render;
pub mod runner;
pub mod sink;

pub use artifact_lint_adapters::{AdapterError, Fs, RealFs, Walk};
pub use catalog::{
    catalog_doctor, load_catalog, parse_catalog, render_catalog_text, ArtifactSpec, Catalog,
    CatalogError, DEFAULT_OUTPUT_ROOT, DEFAULT_STANDARDS_DOC,
};
pub use compare::{compare_artifact, compare_template};
pub use markdown::{extract_fenced_blocks, extract_h2_headings};
pub use policy::{severity_for, DocumentRole};
pub use render::{
    escape_annotation_value, exit_code_for_report, render_github, render_json, render_text,
    verdict_line,
};
pub use runner::{run_lint, LintRequest};
pub use sink::ValidationRun;
