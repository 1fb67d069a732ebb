//! # Schema Engine — Native Errors to Report Children
//!
//! Wraps a compiled `jsonschema` validator (Draft 2020-12) and converts
//! its error iterator into report tree fragments. Each engine error
//! becomes one child node: the label is the ` -> `-joined property path
//! of the error (absent for root-level errors), the single entry is the
//! engine's message. Errors are sorted by instance path before
//! conversion so output order is deterministic across runs regardless
//! of the engine's iteration order.

use std::fmt;

use jsonschema::Validator;
use packwright_core::{FatalError, ReportNode};
use serde_json::Value;

/// A named, compiled JSON Schema.
///
/// Compilation happens once, at rule-set construction time; a schema
/// that does not compile aborts the run before any bundle is touched.
/// Validation itself is infallible and produces a report fragment.
pub struct CompiledSchema {
    name: String,
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile `schema` under Draft 2020-12.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::SchemaCompile`] when the schema is not a
    /// valid schema document (e.g. an internal reference that does not
    /// resolve).
    pub fn compile(name: impl Into<String>, schema: &Value) -> Result<Self, FatalError> {
        let name = name.into();
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts.build(schema).map_err(|e| FatalError::SchemaCompile {
            schema: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { name, validator })
    }

    /// Returns the schema's name (used in fatal diagnostics).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate `data` and return one report child per engine error.
    ///
    /// Valid data yields an empty, non-failed node.
    pub fn report(&self, data: &Value) -> ReportNode {
        let mut errors: Vec<(String, String)> = self
            .validator
            .iter_errors(data)
            .map(|e| (e.instance_path.to_string(), e.to_string()))
            .collect();
        errors.sort();

        let mut report = ReportNode::new();
        for (pointer, message) in errors {
            let mut child = match breadcrumb(&pointer) {
                Some(path) => ReportNode::labeled(path),
                None => ReportNode::new(),
            };
            child.error(message);
            report.add_child(child);
        }
        report
    }
}

/// Convert a JSON Pointer (`/releases/0/mode`) to the breadcrumb form
/// used as a report label (`releases -> 0 -> mode`). Empty pointers
/// (root-level errors) have no breadcrumb.
fn breadcrumb(pointer: &str) -> Option<String> {
    if pointer.is_empty() {
        return None;
    }
    let path = pointer
        .trim_start_matches('/')
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(" -> ");
    Some(path)
}
