//! # Check Action — Validate a Bundle In Place
//!
//! Resolves the package version a bundle declares in its own
//! `metadata.yaml`, runs that version's rule set over the bundle
//! directory and prints the resulting report. A bundle whose metadata
//! cannot even be loaded still produces a report (with the load
//! failure recorded); only an unsupported package version aborts.

use std::path::Path;

use anyhow::Result;
use packwright_rules::{VersionLookup, VersionTable};

use crate::print_verdict;

/// Execute `packwright --check <path>`.
///
/// Returns `0` when the report carries no errors, `1` otherwise.
pub fn run_check(bundle_path: &Path, table: &VersionTable) -> Result<u8> {
    let report = match table.resolve(bundle_path)? {
        VersionLookup::Resolved(entry) => {
            tracing::info!(
                version = entry.version(),
                bundle = %bundle_path.display(),
                "checking bundle"
            );
            entry.validator().validate(bundle_path)?
        }
        VersionLookup::LoadFailed(report) => report,
    };

    Ok(print_verdict(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use packwright_schema::FormatRegistry;

    use crate::scaffold::scaffold_bundle;

    fn table() -> VersionTable {
        let formats = Arc::new(FormatRegistry::with_builtins().unwrap());
        VersionTable::new(&formats).unwrap()
    }

    #[test]
    fn check_passes_for_scaffolded_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let target = dir.path().join("demo");
        scaffold_bundle(&target, "demo", table.entry("5.0.0").unwrap()).unwrap();

        assert_eq!(run_check(&target, &table).unwrap(), 0);
    }

    #[test]
    fn check_fails_for_broken_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let target = dir.path().join("demo");
        scaffold_bundle(&target, "demo", table.entry("5.0.0").unwrap()).unwrap();
        fs::write(
            target.join("deployment_tasks.yaml"),
            "- id: x\n  type: bogus\n",
        )
        .unwrap();

        assert_eq!(run_check(&target, &table).unwrap(), 1);
    }

    #[test]
    fn check_reports_missing_bundle_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();

        assert_eq!(run_check(&dir.path().join("nope"), &table).unwrap(), 1);
    }

    #[test]
    fn check_unsupported_package_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("metadata.yaml"),
            "package_version: '9.9.9'\n",
        )
        .unwrap();
        let table = table();

        assert!(run_check(dir.path(), &table).is_err());
    }
}
