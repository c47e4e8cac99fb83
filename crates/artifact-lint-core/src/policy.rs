// SPDX-License-Identifier: Apache-2.0

use artifact_lint_model::{Diagnosis, Severity, Strictness};

/// Which comparator a document went through, and under what strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Template,
    Artifact(Strictness),
}

/// Severity for a structural finding; `None` means the finding is not reported.
pub fn severity_for(diagnosis: &Diagnosis, role: DocumentRole) -> Option<Severity> {
    match (diagnosis, role) {
        (Diagnosis::Missing { .. }, DocumentRole::Template) => Some(Severity::Error),
        (Diagnosis::Missing { .. }, DocumentRole::Artifact(Strictness::Relaxed)) => {
            Some(Severity::Warning)
        }
        (Diagnosis::Missing { .. }, DocumentRole::Artifact(Strictness::Standard)) => {
            Some(Severity::Error)
        }
        (Diagnosis::OutOfOrder { .. }, _) => Some(Severity::Error),
        (Diagnosis::Extra { .. }, DocumentRole::Artifact(Strictness::Relaxed)) => None,
        (Diagnosis::Extra { .. }, _) => Some(Severity::Warning),
        (Diagnosis::OptionalMisplaced { .. }, _) => Some(Severity::Warning),
    }
}
