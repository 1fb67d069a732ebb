//! Documents for package version 3.0.0. This version introduces
//! release records in the metadata manifest, the `deployment_tasks.yaml`
//! record shapes, and the optional network role and volume layouts.

use serde_json::{json, Value};

use super::{list_of_strings, nonempty_string, role_schema, TASK_ID_PATTERN};

pub fn metadata() -> Value {
    let mut schema = super::v2::metadata();
    schema["title"] = json!("metadata_v3");
    schema["properties"]["package_version"] = json!({"enum": ["3.0.0"]});
    schema["properties"]["releases"] = json!({
        "type": "array",
        "minItems": 1,
        "items": release_record()
    });
    if let Some(required) = schema["required"].as_array_mut() {
        required.push(json!("releases"));
    }
    schema
}

/// One supported release of the target platform.
pub(crate) fn release_record() -> Value {
    json!({
        "type": "object",
        "required": ["version", "os", "mode"],
        "properties": {
            "version": {"type": "string"},
            "os": {"enum": ["ubuntu", "centos"]},
            "mode": {
                "type": "array",
                "items": {"enum": ["ha", "multinode"]}
            },
            "deployment_scripts_path": {"type": "string"},
            "repository_path": {"type": "string"}
        }
    })
}

/// Record schemas for `deployment_tasks.yaml`, keyed by the `type`
/// field. Version 4.0.0 extends this set.
pub fn deployment_task_schemas() -> Vec<(&'static str, Value)> {
    vec![
        ("puppet", puppet_task()),
        ("shell", shell_task()),
        ("group", group_task()),
        ("skipped", skipped_task()),
        ("stage", stage_task()),
        ("reboot", reboot_task()),
    ]
}

/// Properties shared by every deployment task record.
fn task_common_properties(type_name: &str) -> Value {
    json!({
        "id": {"type": "string", "pattern": TASK_ID_PATTERN},
        "type": {"enum": [type_name]},
        "version": {"type": "string"},
        "role": role_schema(),
        "groups": role_schema(),
        "requires": list_of_strings(),
        "required_for": list_of_strings(),
        "condition": {"type": "string"}
    })
}

fn task_record(
    title: &str,
    type_name: &str,
    required: Value,
    parameters: Option<Value>,
) -> Value {
    let mut properties = task_common_properties(type_name);
    if let Some(parameters) = parameters {
        properties["parameters"] = parameters;
    }
    json!({
        "title": title,
        "type": "object",
        "required": required,
        "properties": properties
    })
}

/// A bare record for `type_name` carrying only the shared properties.
/// The 4.0.0 module shapes its new task types from this.
pub(crate) fn task_record_for(type_name: &str) -> Value {
    task_record("deployment_task", type_name, json!(["id", "type"]), None)
}

fn puppet_task() -> Value {
    task_record(
        "puppet_deployment_task",
        "puppet",
        json!(["id", "type", "parameters"]),
        Some(json!({
            "type": "object",
            "required": ["puppet_manifest", "puppet_modules", "timeout"],
            "properties": {
                "puppet_manifest": nonempty_string(),
                "puppet_modules": nonempty_string(),
                "timeout": {"type": "integer"},
                "cwd": {"type": "string"}
            }
        })),
    )
}

fn shell_task() -> Value {
    task_record(
        "shell_deployment_task",
        "shell",
        json!(["id", "type", "parameters"]),
        Some(json!({
            "type": "object",
            "required": ["cmd", "timeout"],
            "properties": {
                "cmd": nonempty_string(),
                "timeout": {"type": "integer"},
                "retries": {"type": "integer"},
                "interval": {"type": "integer"},
                "cwd": {"type": "string"}
            }
        })),
    )
}

fn group_task() -> Value {
    task_record(
        "group_deployment_task",
        "group",
        json!(["id", "type", "role"]),
        Some(json!({
            "type": "object",
            "properties": {
                "strategy": {
                    "type": "object",
                    "properties": {
                        "type": {"enum": ["one_by_one", "parallel"]},
                        "amount": {"type": "integer"}
                    }
                }
            }
        })),
    )
}

fn skipped_task() -> Value {
    task_record("skipped_deployment_task", "skipped", json!(["id", "type"]), None)
}

fn stage_task() -> Value {
    task_record("stage_deployment_task", "stage", json!(["id", "type"]), None)
}

fn reboot_task() -> Value {
    task_record(
        "reboot_deployment_task",
        "reboot",
        json!(["id", "type"]),
        Some(json!({
            "type": "object",
            "properties": {
                "timeout": {"type": "integer"}
            }
        })),
    )
}

pub fn network_roles() -> Value {
    json!({
        "title": "network_roles",
        "type": "array",
        "items": {
            "type": "object",
            "required": ["id", "default_mapping", "properties"],
            "properties": {
                "id": {"type": "string"},
                "default_mapping": {"type": "string"},
                "properties": {
                    "type": "object",
                    "required": ["subnet", "gateway", "vip"],
                    "properties": {
                        "subnet": {"type": "boolean"},
                        "gateway": {"type": "boolean"},
                        "vip": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["name"],
                                "properties": {
                                    "name": {"type": "string"},
                                    "namespace": {"type": "string"}
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub fn volumes() -> Value {
    json!({
        "title": "volumes",
        "type": "object",
        "required": ["volumes_roles_mapping", "volumes"],
        "properties": {
            "volumes_roles_mapping": {
                "type": "object",
                "minProperties": 1,
                "additionalProperties": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["allocate_size", "id"],
                        "properties": {
                            "allocate_size": {"type": "string"},
                            "id": {"type": "string"}
                        }
                    }
                }
            },
            "volumes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "type"],
                    "properties": {
                        "id": {"type": "string"},
                        "type": {"type": "string"}
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_gains_required_releases() {
        let schema = metadata();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("releases")));
        assert_eq!(schema["properties"]["releases"]["minItems"], json!(1));
    }

    #[test]
    fn test_task_schemas_discriminate_on_single_type() {
        for (name, schema) in deployment_task_schemas() {
            assert_eq!(
                schema["properties"]["type"],
                json!({"enum": [name]}),
                "{name} must pin its own type"
            );
        }
    }

    #[test]
    fn test_group_task_requires_role() {
        let (_, group) = deployment_task_schemas()
            .into_iter()
            .find(|(name, _)| *name == "group")
            .unwrap();
        assert!(group["required"].as_array().unwrap().contains(&json!("role")));
    }
}
