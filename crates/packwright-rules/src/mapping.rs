//! # Version Table — One Row per Package Format Version
//!
//! Maps every supported `package_version` to its rule set, its
//! scaffold template layers and the builder that packages it. The
//! table is data: adding a version means adding a row, and resolving
//! a bundle's version never requires more than its `metadata.yaml`.

use std::path::Path;
use std::sync::Arc;

use packwright_core::{load_yaml, FatalError, ReportNode};
use packwright_schema::FormatRegistry;
use serde_json::Value;

use crate::validator::Validator;
use crate::versions;

/// The manifest every bundle must carry at its root.
pub const METADATA_FILE: &str = "metadata.yaml";

/// The package version new bundles are scaffolded with.
pub const DEFAULT_PACKAGE_VERSION: &str = "5.0.0";

/// Which packaging routine produces the distributable artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    /// Plain tarball, version 1.0.0 bundles.
    ArchiveV1,
    /// Tarball with prepared environment config, version 2.0.0.
    ArchiveV2,
    /// Checksummed package with a build manifest, 3.0.0 onward.
    PackageV3,
}

/// One row of the version table.
#[derive(Debug)]
pub struct VersionMappingEntry {
    version: &'static str,
    template_paths: Vec<&'static str>,
    validator: Validator,
    builder: BuilderKind,
}

impl VersionMappingEntry {
    /// The package format version this row covers.
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Scaffold template layers, applied in order.
    pub fn template_paths(&self) -> &[&'static str] {
        &self.template_paths
    }

    /// The rule set for this version.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// The packaging routine for this version.
    pub fn builder(&self) -> BuilderKind {
        self.builder
    }
}

/// Outcome of resolving a bundle's package version from disk.
#[derive(Debug)]
pub enum VersionLookup<'a> {
    /// The manifest declared a known version.
    Resolved(&'a VersionMappingEntry),
    /// The manifest could not be read; the report explains why.
    LoadFailed(ReportNode),
}

/// All supported package format versions, oldest first.
#[derive(Debug)]
pub struct VersionTable {
    entries: Vec<VersionMappingEntry>,
}

impl VersionTable {
    /// Build the table, compiling every version's rule set once.
    ///
    /// # Errors
    ///
    /// Fails only on wiring problems such as a schema that does not
    /// compile.
    pub fn new(formats: &Arc<FormatRegistry>) -> Result<Self, FatalError> {
        let entries = vec![
            VersionMappingEntry {
                version: "1.0.0",
                template_paths: vec!["templates/base", "templates/v1"],
                validator: versions::rule_set_v1()?,
                builder: BuilderKind::ArchiveV1,
            },
            VersionMappingEntry {
                version: "2.0.0",
                template_paths: vec!["templates/base", "templates/v2/bundle_data"],
                validator: versions::rule_set_v2()?,
                builder: BuilderKind::ArchiveV2,
            },
            VersionMappingEntry {
                version: "3.0.0",
                template_paths: vec!["templates/base", "templates/v3/bundle_data"],
                validator: versions::rule_set_v3()?,
                builder: BuilderKind::PackageV3,
            },
            VersionMappingEntry {
                version: "4.0.0",
                template_paths: vec![
                    "templates/base",
                    "templates/v3/bundle_data",
                    "templates/v4/bundle_data",
                ],
                validator: versions::rule_set_v4(formats)?,
                builder: BuilderKind::PackageV3,
            },
            VersionMappingEntry {
                version: "5.0.0",
                template_paths: vec!["templates/base", "templates/v5/bundle_data"],
                validator: versions::rule_set_v5(formats)?,
                builder: BuilderKind::PackageV3,
            },
        ];
        Ok(Self { entries })
    }

    /// Look up the row for `version`.
    ///
    /// # Errors
    ///
    /// [`FatalError::WrongPackageVersion`] when no row matches.
    pub fn entry(&self, version: &str) -> Result<&VersionMappingEntry, FatalError> {
        self.entries
            .iter()
            .find(|e| e.version == version)
            .ok_or_else(|| FatalError::WrongPackageVersion {
                version: version.to_string(),
            })
    }

    /// Supported versions, oldest first.
    pub fn versions(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.version).collect()
    }

    /// Resolve the bundle at `bundle_root` to a table row by reading
    /// only its manifest.
    ///
    /// An unreadable manifest is a property of the bundle and comes
    /// back as [`VersionLookup::LoadFailed`] with the explanation in
    /// the report. A manifest that loads but declares an unknown (or
    /// missing) `package_version` is a request the table cannot serve
    /// and raises [`FatalError::WrongPackageVersion`].
    pub fn resolve(&self, bundle_root: &Path) -> Result<VersionLookup<'_>, FatalError> {
        let metadata_path = bundle_root.join(METADATA_FILE);
        tracing::debug!(path = %metadata_path.display(), "resolving package version");
        match load_yaml(&metadata_path) {
            Ok(data) => {
                let declared = data
                    .get("package_version")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let entry = self.entry(declared)?;
                tracing::debug!(version = entry.version, "resolved package version");
                Ok(VersionLookup::Resolved(entry))
            }
            Err(e) => {
                if let Some(detail) = e.diagnostic() {
                    tracing::debug!(
                        diagnostic = detail,
                        path = %metadata_path.display(),
                        "manifest load failed"
                    );
                }
                let mut node = ReportNode::labeled(metadata_path.display().to_string());
                node.error(e.to_string());
                node.error("Wrong path to the plugin, cannot find \"metadata.yaml\" file");
                Ok(VersionLookup::LoadFailed(node))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn table() -> VersionTable {
        let formats = Arc::new(FormatRegistry::with_builtins().unwrap());
        VersionTable::new(&formats).unwrap()
    }

    // ---- table rows ----

    #[test]
    fn test_versions_oldest_first() {
        assert_eq!(
            table().versions(),
            vec!["1.0.0", "2.0.0", "3.0.0", "4.0.0", "5.0.0"]
        );
    }

    #[test]
    fn test_default_version_is_in_table() {
        assert!(table().entry(DEFAULT_PACKAGE_VERSION).is_ok());
    }

    #[test]
    fn test_builders_per_version() {
        let table = table();
        assert_eq!(table.entry("1.0.0").unwrap().builder(), BuilderKind::ArchiveV1);
        assert_eq!(table.entry("2.0.0").unwrap().builder(), BuilderKind::ArchiveV2);
        for version in ["3.0.0", "4.0.0", "5.0.0"] {
            assert_eq!(
                table.entry(version).unwrap().builder(),
                BuilderKind::PackageV3
            );
        }
    }

    #[test]
    fn test_v4_layers_on_v3_templates() {
        let table = table();
        assert_eq!(
            table.entry("4.0.0").unwrap().template_paths(),
            &[
                "templates/base",
                "templates/v3/bundle_data",
                "templates/v4/bundle_data"
            ]
        );
        assert_eq!(
            table.entry("5.0.0").unwrap().template_paths(),
            &["templates/base", "templates/v5/bundle_data"]
        );
    }

    #[test]
    fn test_unknown_version_is_fatal() {
        let err = table().entry("9.9.9").unwrap_err();
        assert_eq!(err.to_string(), "Wrong package version \"9.9.9\"");
    }

    // ---- resolution ----

    #[test]
    fn test_resolve_reads_declared_version() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("metadata.yaml"),
            "name: demo\npackage_version: 3.0.0\n",
        )
        .unwrap();
        let table = table();
        match table.resolve(dir.path()).unwrap() {
            VersionLookup::Resolved(entry) => assert_eq!(entry.version(), "3.0.0"),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_manifest_reports() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        match table.resolve(dir.path()).unwrap() {
            VersionLookup::LoadFailed(node) => {
                assert!(node.is_failed());
                let rendered = node.render();
                assert!(rendered
                    .contains("Wrong path to the plugin, cannot find \"metadata.yaml\" file"));
            }
            other => panic!("expected load failure, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_unparsable_manifest_reports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("metadata.yaml"), "a: [unclosed\n").unwrap();
        let table = table();
        match table.resolve(dir.path()).unwrap() {
            VersionLookup::LoadFailed(node) => {
                assert!(node.render().contains("Can't parse YAML file"));
            }
            other => panic!("expected load failure, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_package_version_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("metadata.yaml"), "name: demo\n").unwrap();
        let err = table().resolve(dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Wrong package version \"\"");
    }

    #[test]
    fn test_resolve_non_string_package_version_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("metadata.yaml"), "package_version: 3\n").unwrap();
        let err = table().resolve(dir.path()).unwrap_err();
        assert!(matches!(err, FatalError::WrongPackageVersion { .. }));
    }
}
