//! # Schema Documents — Versioned, Embedded, Patchable
//!
//! Every JSON Schema the rule sets compile lives here as a
//! `serde_json::Value` builder. Each version module exposes plain
//! functions returning fresh documents; later versions call the
//! earlier version's builder and patch the returned value instead of
//! inheriting through schema `$ref`s. What a given version validates
//! is exactly what its module returns.
//!
//! Schemas are written against JSON Schema Draft 2020-12, which is the
//! draft [`packwright_schema::CompiledSchema`] pins at compile time.

use serde_json::{json, Value};

pub mod v1;
pub mod v2;
pub mod v3;
pub mod v4;
pub mod v5;

/// Bundle names: lowercase alphanumerics, underscores and dashes.
pub(crate) const NAME_PATTERN: &str = "^[a-z0-9_-]+$";

/// Task identifiers.
pub(crate) const TASK_ID_PATTERN: &str = "^[0-9a-zA-Z_-]+$";

/// Legacy task stages, with an optional `/±N` ordering suffix.
pub(crate) const STAGE_PATTERN: &str =
    r"^(post_deployment|pre_deployment)(/[-+]?([0-9]*\.[0-9]|[0-9]+))?$";

/// Component identifiers: one or two namespace segments and a name.
pub(crate) const COMPONENT_NAME_PATTERN: &str = "^([0-9a-z_-]+:){1,2}[0-9a-z_-]+$";

/// Component references may end in a wildcard segment.
pub(crate) const COMPONENT_REF_PATTERN: &str = r"^([0-9a-z_-]+:){1,2}([0-9a-z_-]+|\*)$";

pub(crate) fn list_of_strings() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

pub(crate) fn nonempty_string() -> Value {
    json!({"type": "string", "minLength": 1})
}

/// A role selector: a single string or a list of strings. The string
/// grammar itself (names, `*`, `/regexp/`) is enforced by the
/// `task_role` format check, not by the schema.
pub(crate) fn role_schema() -> Value {
    json!({
        "anyOf": [
            {"type": "string"},
            {"type": "array", "items": {"type": "string"}}
        ]
    })
}

/// UI restriction entries: a bare condition string or a full object.
pub(crate) fn restrictions() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": {
            "anyOf": [
                {"type": "string"},
                {
                    "type": "object",
                    "required": ["condition"],
                    "properties": {
                        "condition": {"type": "string"},
                        "message": {"type": "string"},
                        "action": {"type": "string"}
                    }
                }
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use packwright_schema::CompiledSchema;

    fn all_documents() -> Vec<(String, Value)> {
        let mut docs = vec![
            ("metadata_v1".to_string(), v1::metadata()),
            ("metadata_v2".to_string(), v2::metadata()),
            ("metadata_v3".to_string(), v3::metadata()),
            ("metadata_v4".to_string(), v4::metadata()),
            ("metadata_v5".to_string(), v5::metadata()),
            ("attr_root".to_string(), v2::attr_root()),
            ("attr_meta".to_string(), v2::attr_meta()),
            ("attr_element".to_string(), v2::attr_element()),
            ("network_roles".to_string(), v3::network_roles()),
            ("volumes".to_string(), v3::volumes()),
            ("components".to_string(), v4::components()),
        ];
        for (name, schema) in v1::task_schemas() {
            docs.push((format!("legacy task {name}"), schema));
        }
        for (name, schema) in v3::deployment_task_schemas() {
            docs.push((format!("v3 task {name}"), schema));
        }
        for (name, schema) in v4::deployment_task_schemas() {
            docs.push((format!("v4 task {name}"), schema));
        }
        docs
    }

    #[test]
    fn test_every_document_compiles() {
        for (name, schema) in all_documents() {
            CompiledSchema::compile(&name, &schema)
                .unwrap_or_else(|e| panic!("{name} failed to compile: {e}"));
        }
    }

    #[test]
    fn test_package_version_enums_track_their_module() {
        for (version, schema) in [
            ("1.0.0", v1::metadata()),
            ("2.0.0", v2::metadata()),
            ("3.0.0", v3::metadata()),
            ("4.0.0", v4::metadata()),
            ("5.0.0", v5::metadata()),
        ] {
            assert_eq!(
                schema["properties"]["package_version"]["enum"],
                json!([version])
            );
        }
    }

    #[test]
    fn test_releases_required_from_v3_onward() {
        for schema in [v1::metadata(), v2::metadata()] {
            assert!(!schema["required"]
                .as_array()
                .unwrap()
                .contains(&json!("releases")));
        }
        for schema in [v3::metadata(), v4::metadata(), v5::metadata()] {
            assert!(schema["required"]
                .as_array()
                .unwrap()
                .contains(&json!("releases")));
        }
    }

    #[test]
    fn test_v5_release_records_no_longer_require_mode() {
        let v4_release = &v4::metadata()["properties"]["releases"]["items"];
        let v5_release = &v5::metadata()["properties"]["releases"]["items"];
        assert!(v4_release["required"]
            .as_array()
            .unwrap()
            .contains(&json!("mode")));
        assert!(!v5_release["required"]
            .as_array()
            .unwrap()
            .contains(&json!("mode")));
    }

    #[test]
    fn test_v4_task_set_extends_v3_task_set() {
        let v3_types: Vec<&str> = v3::deployment_task_schemas()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let v4_types: Vec<&str> = v4::deployment_task_schemas()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        for t in &v3_types {
            assert!(v4_types.contains(t), "v4 lost task type {t}");
        }
        for t in ["copy_files", "sync", "upload_file"] {
            assert!(v4_types.contains(&t));
            assert!(!v3_types.contains(&t));
        }
    }
}
