//! # Checks — Atomic Validation Units
//!
//! A [`Check`] examines one target (a filesystem location or a loaded
//! document) and produces a report fragment. The set of checks is
//! closed: every rule a version can apply is one of these variants, so
//! all behavior is enumerable and exhaustively testable.
//!
//! Malformed bundle *data* never makes a check fail with `Err`; it
//! always becomes error entries in the returned node. The `Err` path is
//! reserved for wiring bugs: a check handed the wrong target kind, an
//! unregistered format name, a path mask that does not compile.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use packwright_core::{DottedVersion, FatalError, ReportNode};
use packwright_schema::{multi_schema_report, CompiledSchema, FormatRegistry, FormatVerdict};
use regex::Regex;
use serde_json::Value;
use walkdir::WalkDir;

/// What a check examines.
#[derive(Debug, Clone, Copy)]
pub enum CheckTarget<'a> {
    /// A filesystem location: the bundle root plus the inspection's
    /// bundle-relative target path (or mask).
    Path {
        /// Bundle root directory.
        bundle_root: &'a Path,
        /// Bundle-relative path of the inspection target.
        relative: &'a str,
    },
    /// A loaded document. Carries the bundle root as well, for checks
    /// that verify path references inside the document.
    Value {
        /// Bundle root directory.
        bundle_root: &'a Path,
        /// The parsed document.
        data: &'a Value,
    },
}

/// Which target kind a check consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Examines the filesystem.
    Path,
    /// Examines a loaded document.
    Value,
}

impl TargetKind {
    fn describe(self) -> &'static str {
        match self {
            TargetKind::Path => "filesystem path",
            TargetKind::Value => "parsed document",
        }
    }
}

/// One atomic validation unit.
///
/// Stateless beyond its configuration; running a check twice over
/// unchanged input yields identical report fragments.
#[derive(Debug)]
pub enum Check {
    /// The target must be a regular file. With `required: false` an
    /// absent file is acceptable and the owning inspection skips its
    /// remaining checks.
    IsFile {
        /// Whether absence is an error.
        required: bool,
    },

    /// The target must be a directory. Same `required` semantics as
    /// [`Check::IsFile`].
    IsDir {
        /// Whether absence is an error.
        required: bool,
    },

    /// A glob-style mask (`*` and `?`, not crossing `/`) that must
    /// match at least one path under the bundle root.
    PathExists {
        /// Bundle-relative mask, e.g. `deployment_scripts/*`.
        mask: String,
    },

    /// The document must conform to one schema.
    SchemaValid {
        /// The compiled schema.
        schema: CompiledSchema,
    },

    /// The document must be a list of records, each validated by the
    /// schema registered for its `type` discriminator.
    MultiSchema {
        /// Discriminator value to schema.
        schemas_by_type: BTreeMap<String, CompiledSchema>,
        /// Accept a null (empty) document as trivially valid.
        allow_empty: bool,
    },

    /// The metadata's declared platform versions must include at least
    /// one release not older than `basic_version`.
    VersionCompatibility {
        /// Oldest platform release this package format supports.
        basic_version: DottedVersion,
    },

    /// Environment attribute maps: the document must satisfy the root
    /// schema and each entry under `attributes` must satisfy the
    /// element schema (the `metadata` entry has its own schema).
    EnvAttributes {
        /// Schema for the whole document.
        root: CompiledSchema,
        /// Schema for the `metadata` attribute entry.
        meta: CompiledSchema,
        /// Schema for every other attribute entry.
        element: CompiledSchema,
    },

    /// Run a registered format predicate over `field` of every record
    /// in a list document.
    CustomFormat {
        /// Name in the format registry.
        format: String,
        /// Record field holding the value (or list of values) to check.
        field: String,
        /// The registry the name is resolved against.
        registry: Arc<FormatRegistry>,
    },

    /// Release records under `releases`: warn on the deprecated `mode`
    /// key and require that configured path fields name existing
    /// directories under the bundle root.
    ReleaseRecords {
        /// Record fields that must point at existing directories.
        path_fields: Vec<String>,
    },

    /// Emit a deprecation warning when the target file is present.
    Deprecation {
        /// The warning text.
        message: String,
    },
}

impl Check {
    /// The target kind this check consumes.
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Check::IsFile { .. }
            | Check::IsDir { .. }
            | Check::PathExists { .. }
            | Check::Deprecation { .. } => TargetKind::Path,
            Check::SchemaValid { .. }
            | Check::MultiSchema { .. }
            | Check::VersionCompatibility { .. }
            | Check::EnvAttributes { .. }
            | Check::CustomFormat { .. }
            | Check::ReleaseRecords { .. } => TargetKind::Value,
        }
    }

    /// True for the existence checks that can gate an inspection.
    pub fn is_existence_gate(&self) -> bool {
        matches!(self, Check::IsFile { .. } | Check::IsDir { .. })
    }

    /// Whether an absent target is an error for this check.
    pub fn required(&self) -> bool {
        match self {
            Check::IsFile { required } | Check::IsDir { required } => *required,
            _ => true,
        }
    }

    /// For existence gates, whether the target is present in the
    /// required form. `None` for every other check.
    pub fn presence(&self, bundle_root: &Path, relative: &str) -> Option<bool> {
        let joined = bundle_root.join(relative);
        match self {
            Check::IsFile { .. } => Some(joined.is_file()),
            Check::IsDir { .. } => Some(joined.is_dir()),
            _ => None,
        }
    }

    /// Short description used in wiring diagnostics.
    fn describe(&self) -> &'static str {
        match self {
            Check::IsFile { .. } => "IsFile",
            Check::IsDir { .. } => "IsDir",
            Check::PathExists { .. } => "PathExists",
            Check::SchemaValid { .. } => "SchemaValid",
            Check::MultiSchema { .. } => "MultiSchema",
            Check::VersionCompatibility { .. } => "VersionCompatibility",
            Check::EnvAttributes { .. } => "EnvAttributes",
            Check::CustomFormat { .. } => "CustomFormat",
            Check::ReleaseRecords { .. } => "ReleaseRecords",
            Check::Deprecation { .. } => "Deprecation",
        }
    }

    /// Run the check against `target`.
    ///
    /// # Errors
    ///
    /// Fails only for wiring bugs: the wrong target kind, an
    /// unregistered format name, a predicate bug, or a mask that does
    /// not translate to a pattern. Malformed bundle data is reported in
    /// the returned node instead.
    pub fn run(&self, target: CheckTarget<'_>) -> Result<ReportNode, FatalError> {
        match (self, target) {
            (Check::IsFile { required }, CheckTarget::Path { bundle_root, relative }) => {
                let mut node = ReportNode::new();
                if !bundle_root.join(relative).is_file() && *required {
                    node.error("File not exists");
                }
                Ok(node)
            }
            (Check::IsDir { required }, CheckTarget::Path { bundle_root, relative }) => {
                let mut node = ReportNode::new();
                if !bundle_root.join(relative).is_dir() && *required {
                    node.error("Directory not exists");
                }
                Ok(node)
            }
            (Check::PathExists { mask }, CheckTarget::Path { bundle_root, .. }) => {
                run_path_exists(mask, bundle_root)
            }
            (Check::Deprecation { message }, CheckTarget::Path { bundle_root, relative }) => {
                let mut node = ReportNode::new();
                if bundle_root.join(relative).exists() {
                    node.warning(message.clone());
                }
                Ok(node)
            }
            (Check::SchemaValid { schema }, CheckTarget::Value { data, .. }) => {
                Ok(schema.report(data))
            }
            (
                Check::MultiSchema {
                    schemas_by_type,
                    allow_empty,
                },
                CheckTarget::Value { data, .. },
            ) => {
                if *allow_empty && data.is_null() {
                    return Ok(ReportNode::new());
                }
                Ok(multi_schema_report(schemas_by_type, data))
            }
            (
                Check::VersionCompatibility { basic_version },
                CheckTarget::Value { data, .. },
            ) => Ok(run_version_compatibility(basic_version, data)),
            (
                Check::EnvAttributes { root, meta, element },
                CheckTarget::Value { data, .. },
            ) => Ok(run_env_attributes(root, meta, element, data)),
            (
                Check::CustomFormat {
                    format,
                    field,
                    registry,
                },
                CheckTarget::Value { data, .. },
            ) => run_custom_format(format, field, registry, data),
            (
                Check::ReleaseRecords { path_fields },
                CheckTarget::Value { bundle_root, data },
            ) => Ok(run_release_records(path_fields, bundle_root, data)),
            (check, _) => Err(FatalError::WrongTarget {
                check: check.describe().to_string(),
                expected: check.target_kind().describe(),
            }),
        }
    }
}

/// Resolve a glob-style mask against everything under the bundle root.
fn run_path_exists(mask: &str, bundle_root: &Path) -> Result<ReportNode, FatalError> {
    let mut node = ReportNode::labeled(format!("Checking path existence: {mask}"));
    let matcher = mask_to_regex(mask)?;
    let mut matched = false;
    for entry in WalkDir::new(bundle_root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let relative: String = entry
            .path()
            .strip_prefix(bundle_root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if matcher.is_match(&relative) {
            matched = true;
            break;
        }
    }
    if !matched {
        node.error("Path not exists");
    }
    Ok(node)
}

/// Translate a mask to an anchored pattern. `*` and `?` match within a
/// single path segment; everything else is literal.
fn mask_to_regex(mask: &str) -> Result<Regex, FatalError> {
    let mut pattern = String::from("^");
    for ch in mask.chars() {
        match ch {
            '*' => pattern.push_str("[^/]*"),
            '?' => pattern.push_str("[^/]"),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).map_err(|e| FatalError::BadPathMask {
        mask: mask.to_string(),
        reason: e.to_string(),
    })
}

/// Partition the metadata's declared platform versions against the
/// format's basic version and report the outcome.
fn run_version_compatibility(basic_version: &DottedVersion, data: &Value) -> ReportNode {
    let mut node = ReportNode::labeled("Checking version compatibility");
    node.info(format!("Expected platform version >= {basic_version}"));

    let package_version = data
        .get("package_version")
        .and_then(Value::as_str)
        .unwrap_or("");
    let declared = data
        .get("platform_version")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut compatible: Vec<String> = Vec::new();
    let mut incompatible: Vec<String> = Vec::new();
    for entry in &declared {
        let text = match entry.as_str() {
            Some(s) => s.to_string(),
            None => {
                node.error(format!("Invalid platform version {entry}"));
                continue;
            }
        };
        match text.parse::<DottedVersion>() {
            Ok(version) if version < *basic_version => incompatible.push(text),
            Ok(_) => compatible.push(text),
            Err(_) => node.error(format!("Invalid platform version \"{text}\"")),
        }
    }

    let listed = incompatible.join(", ");
    if compatible.is_empty() {
        node.error(format!(
            "Current plugin format {package_version} is not compatible with \
             following platform versions: {listed}\n\
             Platform version must be {basic_version} or higher. \
             Please remove {listed} version from metadata.yaml file or \
             downgrade package_version."
        ));
    } else {
        if !incompatible.is_empty() {
            node.warning(format!(
                "Current plugin format {package_version} is not compatible with \
                 following platform versions: {listed}\n\
                 Platform version must be {basic_version} or higher. \
                 Please remove {listed} version from metadata.yaml file or \
                 downgrade package_version."
            ));
        }
        node.info("Plugin is compatible with target platform version.");
    }
    node
}

/// Environment config: root structure plus per-attribute schemas. The
/// `attributes` section is optional; when present, each entry is checked
/// against the element schema, except `metadata` which has its own.
fn run_env_attributes(
    root: &CompiledSchema,
    meta: &CompiledSchema,
    element: &CompiledSchema,
    data: &Value,
) -> ReportNode {
    let mut node = ReportNode::new();
    if data.is_null() {
        // An absent or empty environment config is acceptable.
        return node;
    }
    node.add_child(root.report(data));

    let attributes = data
        .get("attributes")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (attr_id, attr) in &attributes {
        let schema = if attr_id == "metadata" { meta } else { element };
        let attr_report = schema.report(attr);
        if attr_report.is_failed() {
            let mut child = ReportNode::labeled(format!("attributes -> {attr_id}"));
            child.add_child(attr_report);
            node.add_child(child);
        }
    }
    node
}

/// Run a registered format predicate over one field of every record.
/// Shape complaints (non-list document, missing field) are left to the
/// schema checks in the same inspection.
fn run_custom_format(
    format: &str,
    field: &str,
    registry: &FormatRegistry,
    data: &Value,
) -> Result<ReportNode, FatalError> {
    let mut node = ReportNode::new();
    let records = match data.as_array() {
        Some(records) => records,
        None => return Ok(node),
    };
    for (record_id, record) in records.iter().enumerate() {
        let value = match record.get(field) {
            Some(value) => value,
            None => continue,
        };
        if let FormatVerdict::Fail { cause } = registry.check(format, value)? {
            let mut child = ReportNode::labeled(format!("{record_id} -> {field}"));
            child.error(cause);
            node.add_child(child);
        }
    }
    Ok(node)
}

/// Release records: deprecated `mode` directive and path-reference
/// integrity for configured fields.
fn run_release_records(
    path_fields: &[String],
    bundle_root: &Path,
    data: &Value,
) -> ReportNode {
    let mut node = ReportNode::new();
    let releases = match data.get("releases").and_then(Value::as_array) {
        Some(releases) => releases,
        None => return node,
    };
    for (record_id, record) in releases.iter().enumerate() {
        let mut record_node = ReportNode::labeled(format!("releases -> {record_id}"));
        if record.get("mode").is_some() {
            record_node.warning("\"mode\" directive going to be deprecated");
        }
        for field in path_fields {
            let path = match record.get(field).and_then(Value::as_str) {
                Some(path) if !path.is_empty() => path,
                _ => continue,
            };
            if !bundle_root.join(path).is_dir() {
                let mut path_node = ReportNode::labeled(path);
                path_node.error("Directory not exists");
                record_node.add_child(path_node);
            }
        }
        if !record_node.entries().is_empty() || !record_node.children().is_empty() {
            node.add_child(record_node);
        }
    }
    node
}
