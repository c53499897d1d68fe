//! Suite flattening
//!
//! Turns the nested suite mapping into a flat, ordered case plan. A single
//! depth-first traversal yields each leaf together with its group label, so
//! case order and label order cannot fall out of alignment. Flattening
//! order is load-bearing: the 1-based position of a case in the plan names
//! its io artifacts.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::common::{Error, Result};

/// One leaf of the suite tree, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct RawCase {
    /// Group headers preceding this case on the console, one per newly
    /// entered group, each indented by one tab per depth level. Ends with
    /// the leaf-depth indentation so the case name prints aligned.
    pub label: String,
    /// Leaf key, used as the case name
    pub name: String,
    /// (key, value) pairs of the leaf in insertion order, the `case type`
    /// selector included. `None` when the leaf value was not a mapping.
    pub entries: Option<Vec<(String, Value)>>,
}

/// Parse the suite file; the top level must be a mapping
pub fn load_suite(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
    let value: Value = serde_yaml::from_str(&content)?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(Error::SuiteParse(
            "top level must be a mapping of groups and cases".to_string(),
        )),
    }
}

/// Flatten the suite tree depth-first, in document order
pub fn flatten(tree: &Mapping) -> Vec<RawCase> {
    let mut plan = Vec::new();
    let mut pending = String::new();
    walk(tree, 0, &mut pending, &mut plan);
    plan
}

fn walk(node: &Mapping, depth: usize, pending: &mut String, plan: &mut Vec<RawCase>) {
    for (key, value) in node {
        let name = key_to_string(key);
        match value.as_mapping().filter(|m| is_group(m)) {
            Some(group) => {
                pending.push_str(&indent(depth));
                pending.push_str(&name);
                pending.push('\n');
                walk(group, depth + 1, pending, plan);
            }
            None => {
                let label = format!("{}{}", std::mem::take(pending), indent(depth));
                let entries = value.as_mapping().map(|leaf| {
                    leaf.iter()
                        .map(|(k, v)| (key_to_string(k), v.clone()))
                        .collect()
                });
                plan.push(RawCase {
                    label,
                    name,
                    entries,
                });
            }
        }
    }
}

/// A mapping is a group when it is non-empty and every child is itself a
/// mapping. An empty mapping is an (empty) leaf.
fn is_group(mapping: &Mapping) -> bool {
    !mapping.is_empty() && mapping.iter().all(|(_, v)| v.is_mapping())
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
