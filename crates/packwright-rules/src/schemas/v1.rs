//! Documents for package version 1.0.0: the metadata manifest and the
//! legacy `tasks.yaml` record shapes. Later metadata versions are
//! patched copies of [`metadata`], so field additions only ever happen
//! in the module that introduced them.

use serde_json::{json, Value};

use super::{list_of_strings, nonempty_string, role_schema, NAME_PATTERN, STAGE_PATTERN};

pub fn metadata() -> Value {
    json!({
        "title": "metadata_v1",
        "type": "object",
        "required": [
            "name",
            "title",
            "version",
            "package_version",
            "description",
            "platform_version",
            "licenses",
            "authors",
            "homepage"
        ],
        "properties": {
            "name": {"type": "string", "pattern": NAME_PATTERN},
            "title": {"type": "string"},
            "version": {"type": "string"},
            "package_version": {"enum": ["1.0.0"]},
            "description": {"type": "string"},
            "platform_version": list_of_strings(),
            "licenses": list_of_strings(),
            "authors": list_of_strings(),
            "homepage": {"type": "string"}
        }
    })
}

/// Record schemas for legacy `tasks.yaml`, keyed by the `type` field.
pub fn task_schemas() -> Vec<(&'static str, Value)> {
    vec![
        ("puppet", puppet_task()),
        ("shell", shell_task()),
        ("reboot", reboot_task()),
    ]
}

fn puppet_task() -> Value {
    json!({
        "title": "puppet_task",
        "type": "object",
        "required": ["type", "stage", "role", "parameters"],
        "properties": {
            "type": {"enum": ["puppet"]},
            "stage": {"type": "string", "pattern": STAGE_PATTERN},
            "role": role_schema(),
            "parameters": {
                "type": "object",
                "required": ["puppet_manifest", "puppet_modules", "timeout"],
                "properties": {
                    "puppet_manifest": nonempty_string(),
                    "puppet_modules": nonempty_string(),
                    "timeout": {"type": "integer"},
                    "cwd": {"type": "string"}
                }
            }
        }
    })
}

fn shell_task() -> Value {
    json!({
        "title": "shell_task",
        "type": "object",
        "required": ["type", "stage", "role", "parameters"],
        "properties": {
            "type": {"enum": ["shell"]},
            "stage": {"type": "string", "pattern": STAGE_PATTERN},
            "role": role_schema(),
            "parameters": {
                "type": "object",
                "required": ["cmd", "timeout"],
                "properties": {
                    "cmd": nonempty_string(),
                    "timeout": {"type": "integer"},
                    "retries": {"type": "integer"},
                    "interval": {"type": "integer"},
                    "cwd": {"type": "string"}
                }
            }
        }
    })
}

fn reboot_task() -> Value {
    json!({
        "title": "reboot_task",
        "type": "object",
        "required": ["type", "stage", "role"],
        "properties": {
            "type": {"enum": ["reboot"]},
            "stage": {"type": "string", "pattern": STAGE_PATTERN},
            "role": role_schema(),
            "parameters": {
                "type": "object",
                "properties": {
                    "timeout": {"type": "integer"}
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_schemas_cover_legacy_types() {
        let types: Vec<&str> = task_schemas().into_iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec!["puppet", "shell", "reboot"]);
    }

    #[test]
    fn test_metadata_pins_package_version() {
        assert_eq!(
            metadata()["properties"]["package_version"],
            json!({"enum": ["1.0.0"]})
        );
    }
}
