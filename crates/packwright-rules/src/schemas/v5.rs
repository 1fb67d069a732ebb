//! Documents for package version 5.0.0. Release records drop `mode`
//! from their required fields (the field itself stays schema-valid
//! while the release record check warns about it) and gain optional
//! per-release artifact paths.

use serde_json::{json, Value};

/// Optional per-release paths, all relative to the bundle root. Their
/// existence is enforced by the release record check, not the schema.
pub const RELEASE_PATH_FIELDS: [&str; 6] = [
    "repository_path",
    "deployment_scripts_path",
    "attributes_path",
    "components_path",
    "network_roles_path",
    "volumes_path",
];

pub fn metadata() -> Value {
    let mut schema = super::v4::metadata();
    schema["title"] = json!("metadata_v5");
    schema["properties"]["package_version"] = json!({"enum": ["5.0.0"]});
    schema["properties"]["releases"] = json!({
        "type": "array",
        "minItems": 1,
        "items": release_record()
    });
    schema
}

fn release_record() -> Value {
    let mut record = super::v3::release_record();
    record["required"] = json!(["version", "os"]);
    for field in RELEASE_PATH_FIELDS {
        record["properties"][field] = json!({"type": "string"});
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_records_accept_path_fields() {
        let record = &metadata()["properties"]["releases"]["items"];
        for field in RELEASE_PATH_FIELDS {
            assert_eq!(record["properties"][field], json!({"type": "string"}));
        }
    }

    #[test]
    fn test_mode_still_schema_valid() {
        let record = &metadata()["properties"]["releases"]["items"];
        assert_eq!(record["properties"]["mode"]["type"], json!("array"));
    }
}
