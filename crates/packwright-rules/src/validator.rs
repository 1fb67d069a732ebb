//! # Validators — One Rule Set per Package Version
//!
//! A [`Validator`] is an ordered list of named inspections for one
//! package format version. Later versions never inherit implicitly:
//! they are derived from an earlier version's list plus an explicit
//! [`Delta`] list, applied once at construction. Every version's
//! effective rule set is therefore enumerable and testable on its own.

use std::path::Path;

use packwright_core::{FatalError, ReportNode};

use crate::inspection::Inspection;

/// One composition step when deriving a version's rule set.
#[derive(Debug)]
pub enum Delta {
    /// Append a new inspection. Its name must be unused.
    Add(Inspection),
    /// Drop the inspection with this name.
    Remove(&'static str),
    /// Swap the like-named inspection's check sequence wholesale,
    /// keeping its position in the run order.
    Replace(Inspection),
}

/// The rule set for one package format version.
#[derive(Debug)]
pub struct Validator {
    version: String,
    inspections: Vec<Inspection>,
}

impl Validator {
    /// Create a base rule set from an explicit inspection list.
    pub fn new(version: impl Into<String>, inspections: Vec<Inspection>) -> Self {
        Self {
            version: version.into(),
            inspections,
        }
    }

    /// Derive the next version's rule set by applying `deltas` in order.
    ///
    /// Consumes this validator; every version in the table is built
    /// from a fresh chain, so nothing is shared between versions.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::RuleSet`] when a delta adds a duplicate
    /// name or addresses a name that does not exist.
    pub fn derive(
        self,
        version: impl Into<String>,
        deltas: Vec<Delta>,
    ) -> Result<Validator, FatalError> {
        let version = version.into();
        let mut inspections = self.inspections;
        for delta in deltas {
            match delta {
                Delta::Add(inspection) => {
                    if inspections.iter().any(|i| i.name() == inspection.name()) {
                        return Err(FatalError::RuleSet {
                            version,
                            reason: format!(
                                "cannot add {:?}: an inspection with that name already exists",
                                inspection.name()
                            ),
                        });
                    }
                    inspections.push(inspection);
                }
                Delta::Remove(name) => {
                    let before = inspections.len();
                    inspections.retain(|i| i.name() != name);
                    if inspections.len() == before {
                        return Err(FatalError::RuleSet {
                            version,
                            reason: format!("cannot remove unknown inspection {name:?}"),
                        });
                    }
                }
                Delta::Replace(inspection) => {
                    match inspections
                        .iter_mut()
                        .find(|i| i.name() == inspection.name())
                    {
                        Some(slot) => *slot = inspection,
                        None => {
                            return Err(FatalError::RuleSet {
                                version,
                                reason: format!(
                                    "cannot replace unknown inspection {:?}",
                                    inspection.name()
                                ),
                            });
                        }
                    }
                }
            }
        }
        Ok(Validator {
            version,
            inspections,
        })
    }

    /// The package format version this rule set applies to.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The inspections in run order.
    pub fn inspections(&self) -> &[Inspection] {
        &self.inspections
    }

    /// The inspection names in run order.
    pub fn inspection_names(&self) -> Vec<&str> {
        self.inspections.iter().map(Inspection::name).collect()
    }

    /// Validate the bundle at `bundle_root`.
    ///
    /// Returns a node labeled with the bundle path whose children are
    /// the inspection results. One inspection's failure never prevents
    /// the others from running.
    ///
    /// # Errors
    ///
    /// Propagates wiring-level [`FatalError`]s only; everything about
    /// the bundle lands in the report.
    pub fn validate(&self, bundle_root: &Path) -> Result<ReportNode, FatalError> {
        tracing::debug!(
            version = %self.version,
            bundle = %bundle_root.display(),
            "validating bundle"
        );
        let mut node = ReportNode::labeled(bundle_root.display().to_string());
        for inspection in &self.inspections {
            node.add_child(inspection.run(bundle_root)?);
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;
    use std::fs;

    fn inspection(name: &str, target: &str, required: bool) -> Inspection {
        Inspection::new(name, target, vec![Check::IsFile { required }])
    }

    fn base() -> Validator {
        Validator::new(
            "1.0.0",
            vec![
                inspection("metadata", "metadata.yaml", true),
                inspection("legacy-tasks", "tasks.yaml", true),
            ],
        )
    }

    // ---- delta composition ----

    #[test]
    fn test_add_appends_in_order() {
        let derived = base()
            .derive(
                "2.0.0",
                vec![Delta::Add(inspection("env-config", "environment_config.yaml", false))],
            )
            .unwrap();
        assert_eq!(derived.version(), "2.0.0");
        assert_eq!(
            derived.inspection_names(),
            vec!["metadata", "legacy-tasks", "env-config"]
        );
    }

    #[test]
    fn test_remove_drops_named_inspection() {
        let derived = base()
            .derive("2.0.0", vec![Delta::Remove("legacy-tasks")])
            .unwrap();
        assert_eq!(derived.inspection_names(), vec!["metadata"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let derived = base()
            .derive(
                "2.0.0",
                vec![Delta::Replace(inspection("metadata", "metadata.yaml", false))],
            )
            .unwrap();
        assert_eq!(
            derived.inspection_names(),
            vec!["metadata", "legacy-tasks"]
        );
        assert!(!derived.inspections()[0].checks()[0].required());
    }

    #[test]
    fn test_remove_unknown_name_is_fatal() {
        let err = base()
            .derive("2.0.0", vec![Delta::Remove("no-such")])
            .unwrap_err();
        assert!(matches!(err, FatalError::RuleSet { .. }));
        assert!(err.to_string().contains("no-such"));
    }

    #[test]
    fn test_replace_unknown_name_is_fatal() {
        let err = base()
            .derive(
                "2.0.0",
                vec![Delta::Replace(inspection("no-such", "x.yaml", true))],
            )
            .unwrap_err();
        assert!(matches!(err, FatalError::RuleSet { .. }));
    }

    #[test]
    fn test_add_duplicate_name_is_fatal() {
        let err = base()
            .derive(
                "2.0.0",
                vec![Delta::Add(inspection("metadata", "other.yaml", true))],
            )
            .unwrap_err();
        assert!(matches!(err, FatalError::RuleSet { .. }));
    }

    #[test]
    fn test_deltas_apply_in_sequence() {
        // Remove then re-add under the same name is legal.
        let derived = base()
            .derive(
                "2.0.0",
                vec![
                    Delta::Remove("legacy-tasks"),
                    Delta::Add(inspection("legacy-tasks", "tasks.yaml", false)),
                ],
            )
            .unwrap();
        assert_eq!(
            derived.inspection_names(),
            vec!["metadata", "legacy-tasks"]
        );
    }

    // ---- validation ----

    #[test]
    fn test_all_inspections_run_despite_failures() {
        let dir = tempfile::tempdir().unwrap();
        // Neither file exists; both inspections must still report.
        let report = base().validate(dir.path()).unwrap();
        assert!(report.is_failed());
        assert_eq!(report.children().len(), 2);
        assert!(report.children()[0].is_failed());
        assert!(report.children()[1].is_failed());
    }

    #[test]
    fn test_root_node_labeled_with_bundle_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("metadata.yaml"), "x: 1\n").unwrap();
        fs::write(dir.path().join("tasks.yaml"), "[]\n").unwrap();
        let report = base().validate(dir.path()).unwrap();
        assert_eq!(
            report.label(),
            Some(dir.path().display().to_string().as_str())
        );
        assert!(!report.is_failed());
    }
}
