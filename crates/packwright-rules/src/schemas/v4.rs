//! Documents for package version 4.0.0: metadata gains the optional
//! `groups` and `is_hotpluggable` fields, the deployment task set
//! gains the file transfer types, and `components.yaml` arrives.

use serde_json::{json, Value};

use super::{nonempty_string, COMPONENT_NAME_PATTERN, COMPONENT_REF_PATTERN};

pub fn metadata() -> Value {
    let mut schema = super::v3::metadata();
    schema["title"] = json!("metadata_v4");
    schema["properties"]["package_version"] = json!({"enum": ["4.0.0"]});
    schema["properties"]["groups"] = json!({
        "type": "array",
        "uniqueItems": true,
        "items": {
            "enum": [
                "network",
                "storage",
                "storage::block",
                "storage::object",
                "hypervisor",
                "monitoring",
                "equipment"
            ]
        }
    });
    schema["properties"]["is_hotpluggable"] = json!({"type": "boolean"});
    schema
}

/// The 3.0.0 task set plus `copy_files`, `sync` and `upload_file`.
pub fn deployment_task_schemas() -> Vec<(&'static str, Value)> {
    let mut schemas = super::v3::deployment_task_schemas();
    schemas.push(("copy_files", copy_files_task()));
    schemas.push(("sync", sync_task()));
    schemas.push(("upload_file", upload_file_task()));
    schemas
}

fn copy_files_task() -> Value {
    let mut schema = super::v3::task_record_for("copy_files");
    schema["title"] = json!("copy_files_deployment_task");
    schema["required"] = json!(["id", "type", "role", "parameters"]);
    schema["properties"]["parameters"] = json!({
        "type": "object",
        "required": ["files"],
        "properties": {
            "files": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["src", "dst"],
                    "properties": {
                        "src": nonempty_string(),
                        "dst": nonempty_string()
                    }
                }
            },
            "permissions": {"type": "string"},
            "dir_permissions": {"type": "string"}
        }
    });
    schema
}

fn sync_task() -> Value {
    let mut schema = super::v3::task_record_for("sync");
    schema["title"] = json!("sync_deployment_task");
    schema["required"] = json!(["id", "type", "role", "parameters"]);
    schema["properties"]["parameters"] = json!({
        "type": "object",
        "required": ["src", "dst"],
        "properties": {
            "src": nonempty_string(),
            "dst": nonempty_string(),
            "timeout": {"type": "integer"}
        }
    });
    schema
}

fn upload_file_task() -> Value {
    let mut schema = super::v3::task_record_for("upload_file");
    schema["title"] = json!("upload_file_deployment_task");
    schema["required"] = json!(["id", "type", "role", "parameters"]);
    schema["properties"]["parameters"] = json!({
        "type": "object",
        "required": ["path", "data"],
        "properties": {
            "path": nonempty_string(),
            "data": nonempty_string()
        }
    });
    schema
}

pub fn components() -> Value {
    json!({
        "title": "components",
        "type": "array",
        "items": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string", "pattern": COMPONENT_NAME_PATTERN},
                "label": {"type": "string"},
                "description": {"type": "string"},
                "compatible": component_refs(),
                "incompatible": component_refs(),
                "requires": component_refs()
            }
        }
    })
}

fn component_refs() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string", "pattern": COMPONENT_REF_PATTERN},
                "message": {"type": "string"}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keeps_groups_optional() {
        let schema = metadata();
        assert!(!schema["required"]
            .as_array()
            .unwrap()
            .contains(&json!("groups")));
        assert_eq!(
            schema["properties"]["is_hotpluggable"],
            json!({"type": "boolean"})
        );
    }

    #[test]
    fn test_file_transfer_tasks_require_parameters() {
        for wanted in ["copy_files", "sync", "upload_file"] {
            let (_, schema) = deployment_task_schemas()
                .into_iter()
                .find(|(name, _)| *name == wanted)
                .unwrap();
            assert!(
                schema["required"]
                    .as_array()
                    .unwrap()
                    .contains(&json!("parameters")),
                "{wanted} must require parameters"
            );
        }
    }
}
