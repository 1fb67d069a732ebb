//! # Rule Sets for Package Versions 1.0.0 through 5.0.0
//!
//! One builder per supported package format version. Version 1.0.0
//! lists its inspections outright; every later version derives from
//! its predecessor through an explicit [`Delta`] list, so the
//! difference between two adjacent versions reads directly off this
//! module. Nothing is inherited implicitly.
//!
//! Each version also pins the oldest platform release it supports,
//! which the metadata inspection's compatibility check enforces
//! against the bundle's declared `platform_version` list.

use std::collections::BTreeMap;
use std::sync::Arc;

use packwright_core::{DottedVersion, FatalError};
use packwright_schema::format::TASK_ROLE_FORMAT;
use packwright_schema::{CompiledSchema, FormatRegistry};
use serde_json::Value;

use crate::check::Check;
use crate::inspection::Inspection;
use crate::schemas;
use crate::schemas::v5::RELEASE_PATH_FIELDS;
use crate::validator::{Delta, Validator};

fn compile_set(
    documents: Vec<(&'static str, Value)>,
) -> Result<BTreeMap<String, CompiledSchema>, FatalError> {
    let mut by_type = BTreeMap::new();
    for (name, schema) in documents {
        by_type.insert(name.to_string(), CompiledSchema::compile(name, &schema)?);
    }
    Ok(by_type)
}

fn basic_version(rule_set: &str, raw: &str) -> Result<DottedVersion, FatalError> {
    raw.parse::<DottedVersion>().map_err(|e| FatalError::RuleSet {
        version: rule_set.to_string(),
        reason: format!("invalid basic platform version {raw:?}: {e}"),
    })
}

/// Version 1.0.0: metadata manifest, required legacy tasks and a
/// populated `deployment_scripts` directory.
pub fn rule_set_v1() -> Result<Validator, FatalError> {
    let metadata = Inspection::new(
        "metadata",
        "metadata.yaml",
        vec![
            Check::IsFile { required: true },
            Check::SchemaValid {
                schema: CompiledSchema::compile("metadata_v1", &schemas::v1::metadata())?,
            },
            Check::VersionCompatibility {
                basic_version: basic_version("1.0.0", "6.0")?,
            },
        ],
    );
    let legacy_tasks = Inspection::new(
        "legacy-tasks",
        "tasks.yaml",
        vec![
            Check::IsFile { required: true },
            Check::MultiSchema {
                schemas_by_type: compile_set(schemas::v1::task_schemas())?,
                allow_empty: false,
            },
        ],
    );
    let deployment_scripts = Inspection::new(
        "deployment-scripts",
        "deployment_scripts",
        vec![Check::PathExists {
            mask: "deployment_scripts/*".to_string(),
        }],
    );
    Ok(Validator::new(
        "1.0.0",
        vec![metadata, legacy_tasks, deployment_scripts],
    ))
}

/// Version 2.0.0: raises the platform floor to 6.1 and starts
/// validating `environment_config.yaml` when present.
pub fn rule_set_v2() -> Result<Validator, FatalError> {
    rule_set_v1()?.derive(
        "2.0.0",
        vec![
            Delta::Replace(Inspection::new(
                "metadata",
                "metadata.yaml",
                vec![
                    Check::IsFile { required: true },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile(
                            "metadata_v2",
                            &schemas::v2::metadata(),
                        )?,
                    },
                    Check::VersionCompatibility {
                        basic_version: basic_version("2.0.0", "6.1")?,
                    },
                ],
            )),
            Delta::Add(Inspection::new(
                "env-config",
                "environment_config.yaml",
                vec![
                    Check::IsFile { required: false },
                    Check::EnvAttributes {
                        root: CompiledSchema::compile("attr_root", &schemas::v2::attr_root())?,
                        meta: CompiledSchema::compile("attr_meta", &schemas::v2::attr_meta())?,
                        element: CompiledSchema::compile(
                            "attr_element",
                            &schemas::v2::attr_element(),
                        )?,
                    },
                ],
            )),
        ],
    )
}

/// Version 3.0.0: deployment moves from the scripts directory to
/// `deployment_tasks.yaml`, legacy tasks become optional, release
/// records are required in the manifest, and the network role and
/// volume layouts are validated when present.
pub fn rule_set_v3() -> Result<Validator, FatalError> {
    rule_set_v2()?.derive(
        "3.0.0",
        vec![
            Delta::Replace(Inspection::new(
                "metadata",
                "metadata.yaml",
                vec![
                    Check::IsFile { required: true },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile(
                            "metadata_v3",
                            &schemas::v3::metadata(),
                        )?,
                    },
                    Check::VersionCompatibility {
                        basic_version: basic_version("3.0.0", "7.0")?,
                    },
                ],
            )),
            Delta::Replace(Inspection::new(
                "legacy-tasks",
                "tasks.yaml",
                vec![
                    Check::IsFile { required: false },
                    Check::MultiSchema {
                        schemas_by_type: compile_set(schemas::v1::task_schemas())?,
                        allow_empty: true,
                    },
                ],
            )),
            Delta::Remove("deployment-scripts"),
            Delta::Add(Inspection::new(
                "deployment-tasks",
                "deployment_tasks.yaml",
                vec![
                    Check::IsFile { required: true },
                    Check::MultiSchema {
                        schemas_by_type: compile_set(schemas::v3::deployment_task_schemas())?,
                        allow_empty: false,
                    },
                ],
            )),
            Delta::Add(Inspection::new(
                "network-roles",
                "network_roles.yaml",
                vec![
                    Check::IsFile { required: false },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile(
                            "network_roles",
                            &schemas::v3::network_roles(),
                        )?,
                    },
                ],
            )),
            Delta::Add(Inspection::new(
                "volumes",
                "volumes.yaml",
                vec![
                    Check::IsFile { required: false },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile("volumes", &schemas::v3::volumes())?,
                    },
                ],
            )),
        ],
    )
}

/// Version 4.0.0: the task set gains the file transfer types, role
/// and group selectors are checked against the `task_role` format,
/// and `components.yaml` is validated when present.
pub fn rule_set_v4(formats: &Arc<FormatRegistry>) -> Result<Validator, FatalError> {
    rule_set_v3()?.derive(
        "4.0.0",
        vec![
            Delta::Replace(Inspection::new(
                "metadata",
                "metadata.yaml",
                vec![
                    Check::IsFile { required: true },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile(
                            "metadata_v4",
                            &schemas::v4::metadata(),
                        )?,
                    },
                    Check::VersionCompatibility {
                        basic_version: basic_version("4.0.0", "8.0")?,
                    },
                ],
            )),
            Delta::Replace(Inspection::new(
                "deployment-tasks",
                "deployment_tasks.yaml",
                vec![
                    Check::IsFile { required: true },
                    Check::MultiSchema {
                        schemas_by_type: compile_set(schemas::v4::deployment_task_schemas())?,
                        allow_empty: false,
                    },
                    Check::CustomFormat {
                        format: TASK_ROLE_FORMAT.to_string(),
                        field: "role".to_string(),
                        registry: Arc::clone(formats),
                    },
                    Check::CustomFormat {
                        format: TASK_ROLE_FORMAT.to_string(),
                        field: "groups".to_string(),
                        registry: Arc::clone(formats),
                    },
                ],
            )),
            Delta::Add(Inspection::new(
                "components",
                "components.yaml",
                vec![
                    Check::IsFile { required: false },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile(
                            "components",
                            &schemas::v4::components(),
                        )?,
                    },
                ],
            )),
        ],
    )
}

/// Version 5.0.0: release records carry their own artifact paths and
/// deprecate `mode`, and legacy `tasks.yaml` is ignored save for a
/// deprecation warning.
pub fn rule_set_v5(formats: &Arc<FormatRegistry>) -> Result<Validator, FatalError> {
    rule_set_v4(formats)?.derive(
        "5.0.0",
        vec![
            Delta::Replace(Inspection::new(
                "metadata",
                "metadata.yaml",
                vec![
                    Check::IsFile { required: true },
                    Check::SchemaValid {
                        schema: CompiledSchema::compile(
                            "metadata_v5",
                            &schemas::v5::metadata(),
                        )?,
                    },
                    Check::VersionCompatibility {
                        basic_version: basic_version("5.0.0", "8.0")?,
                    },
                    Check::ReleaseRecords {
                        path_fields: RELEASE_PATH_FIELDS
                            .iter()
                            .map(|field| field.to_string())
                            .collect(),
                    },
                ],
            )),
            Delta::Replace(Inspection::new(
                "legacy-tasks",
                "tasks.yaml",
                vec![Check::Deprecation {
                    message: "tasks.yaml file is deprecated".to_string(),
                }],
            )),
        ],
    )
}
