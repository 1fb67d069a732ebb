//! Documents for package version 2.0.0: the patched metadata manifest
//! plus the three environment attribute shapes checked against
//! `environment_config.yaml`.

use serde_json::{json, Value};

use super::restrictions;

pub fn metadata() -> Value {
    let mut schema = super::v1::metadata();
    schema["title"] = json!("metadata_v2");
    schema["properties"]["package_version"] = json!({"enum": ["2.0.0"]});
    schema
}

/// The document root. Anything beyond `attributes` is tolerated so
/// environments can carry extra top-level sections.
pub fn attr_root() -> Value {
    json!({
        "title": "attr_root",
        "type": "object",
        "properties": {
            "attributes": {"type": "object"}
        }
    })
}

/// The reserved `metadata` entry inside `attributes`.
pub fn attr_meta() -> Value {
    json!({
        "title": "attr_meta",
        "type": "object",
        "required": ["label"],
        "properties": {
            "label": {"type": "string"},
            "weight": {"type": "integer"},
            "toggleable": {"type": "boolean"},
            "enabled": {"type": "boolean"},
            "restrictions": restrictions()
        }
    })
}

/// Every non-`metadata` entry inside `attributes`.
pub fn attr_element() -> Value {
    json!({
        "title": "attr_element",
        "type": "object",
        "required": ["type", "label", "weight", "value"],
        "properties": {
            "type": {"type": "string"},
            "label": {"type": "string"},
            "weight": {"type": "integer"},
            "value": {"type": ["string", "boolean"]},
            "description": {"type": "string"},
            "restrictions": restrictions(),
            "values": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["data", "label"],
                    "properties": {
                        "data": {"type": "string"},
                        "label": {"type": "string"},
                        "description": {"type": "string"}
                    }
                }
            }
        }
    })
}
