//! # Discriminated Multi-Schema Validation
//!
//! Validates a list of heterogeneous records where each record's schema
//! is selected by its `type` field. Used for task manifests, where
//! `puppet`, `shell`, `group` and friends all have different shapes.

use std::collections::BTreeMap;

use packwright_core::ReportNode;
use serde_json::Value;

use crate::engine::CompiledSchema;

/// Discriminator field consulted on every record.
pub const DISCRIMINATOR: &str = "type";

/// Validate a list of records against per-type schemas.
///
/// - Non-array data yields exactly one
///   `Data should be a list of entities` error and nothing else.
/// - Each record's `type` field (empty string when absent) selects a
///   schema from `schemas_by_type`; the record's validation report is
///   attached as a child. Unregistered types yield an
///   `Invalid type: <type> for record: <index>` error.
/// - Every record is processed; one bad record never hides the rest.
pub fn multi_schema_report(
    schemas_by_type: &BTreeMap<String, CompiledSchema>,
    data: &Value,
) -> ReportNode {
    let mut report = ReportNode::new();
    let records = match data.as_array() {
        Some(records) => records,
        None => {
            report.error("Data should be a list of entities");
            return report;
        }
    };

    for (record_id, record) in records.iter().enumerate() {
        let record_type = match record.get(DISCRIMINATOR) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        match schemas_by_type.get(&record_type) {
            Some(schema) => report.add_child(schema.report(record)),
            None => report.error(format!(
                "Invalid type: {record_type} for record: {record_id}"
            )),
        }
    }
    report
}
