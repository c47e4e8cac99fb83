// SPDX-License-Identifier: Apache-2.0

//! Heading-sequence comparison against a [`Schema`].
//!
//! Positions always refer to the first occurrence of a heading. A document
//! missing any required heading is never checked for order or extras in the
//! same pass.

use std::collections::BTreeSet;

use artifact_lint_model::{Diagnosis, Schema};

fn first_position(headings: &[String], heading: &str) -> Option<usize> {
    headings.iter().position(|h| h == heading)
}

fn missing_headings(headings: &[String], schema: &Schema) -> Vec<String> {
    schema
        .required()
        .iter()
        .filter(|required| first_position(headings, required).is_none())
        .cloned()
        .collect()
}

fn extra_headings(headings: &[String], schema: &Schema) -> Vec<String> {
    let mut seen = BTreeSet::new();
    headings
        .iter()
        .filter(|h| !schema.is_recognized(h))
        .filter(|h| seen.insert(h.as_str()))
        .cloned()
        .collect()
}

/// Required headings in document order, first occurrences only.
fn required_in_document_order<'a>(headings: &'a [String], schema: &Schema) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    headings
        .iter()
        .map(String::as_str)
        .filter(|h| schema.is_required(h))
        .filter(|h| seen.insert(*h))
        .collect()
}

/// Template mode: the first required heading found at the wrong position.
fn template_order_violation(headings: &[String], schema: &Schema) -> Option<Diagnosis> {
    let found = required_in_document_order(headings, schema);
    schema
        .required()
        .iter()
        .zip(found)
        .enumerate()
        .find(|(_, (expected, found))| expected.as_str() != *found)
        .map(|(index, (expected, found))| Diagnosis::OutOfOrder {
            before: expected.clone(),
            after: found.to_string(),
            position: index + 1,
        })
}

/// Artifact mode: the first adjacent pair of present required headings whose
/// document positions are inverted.
fn artifact_order_violation(headings: &[String], schema: &Schema) -> Option<Diagnosis> {
    let present = schema
        .required()
        .iter()
        .filter_map(|h| first_position(headings, h).map(|pos| (h, pos)))
        .collect::<Vec<_>>();
    present
        .windows(2)
        .enumerate()
        .find(|(_, pair)| pair[0].1 > pair[1].1)
        .map(|(index, pair)| Diagnosis::OutOfOrder {
            before: pair[0].0.clone(),
            after: pair[1].0.clone(),
            position: index + 1,
        })
}

fn misplaced_optionals(headings: &[String], schema: &Schema) -> Vec<Diagnosis> {
    let anchor = schema.anchor();
    let Some(anchor_pos) = first_position(headings, anchor) else {
        return Vec::new();
    };
    schema
        .optional()
        .iter()
        .filter(|optional| {
            first_position(headings, optional).is_some_and(|pos| pos < anchor_pos)
        })
        .map(|optional| Diagnosis::OptionalMisplaced {
            heading: optional.clone(),
            anchor: anchor.to_string(),
        })
        .collect()
}

/// Strict comparison used for canonical templates.
pub fn compare_template(headings: &[String], schema: &Schema) -> Vec<Diagnosis> {
    let missing = missing_headings(headings, schema);
    if !missing.is_empty() {
        return vec![Diagnosis::Missing { headings: missing }];
    }

    let mut out = Vec::new();
    out.extend(template_order_violation(headings, schema));
    let extras = extra_headings(headings, schema);
    if !extras.is_empty() {
        out.push(Diagnosis::Extra { headings: extras });
    }
    out
}

/// Comparison used for generated artifacts. Severity is left to the policy;
/// every deviation is reported here.
pub fn compare_artifact(headings: &[String], schema: &Schema) -> Vec<Diagnosis> {
    let mut out = Vec::new();
    let missing = missing_headings(headings, schema);
    let complete = missing.is_empty();
    if !complete {
        out.push(Diagnosis::Missing { headings: missing });
    } else {
        out.extend(artifact_order_violation(headings, schema));
    }

    out.extend(misplaced_optionals(headings, schema));

    if complete {
        let extras = extra_headings(headings, schema);
        if !extras.is_empty() {
            out.push(Diagnosis::Extra { headings: extras });
        }
    }
    out
}
