//! # Inspections — Named Check Sequences per File
//!
//! An [`Inspection`] binds one bundle-relative target path to an ordered
//! check sequence and produces one labeled report node per run.
//!
//! ## Short-Circuit Rules
//!
//! - A leading existence check (`IsFile`/`IsDir`) is the *gate*. When
//!   the target is absent, the inspection stops there: with
//!   `required: true` the gate's error fails the node; with
//!   `required: false` the node passes trivially and the remaining
//!   checks are skipped, not failed.
//! - The target file is loaded at most once, lazily, before the first
//!   check that consumes a parsed document. A load failure becomes one
//!   error entry on the inspection node and halts the inspection.
//! - Apart from those two rules, every check runs and its node is
//!   attached as a child; one check's failure never hides another's.

use std::path::Path;

use packwright_core::{load_yaml, FatalError, ReportNode};
use serde_json::Value;

use crate::check::{Check, CheckTarget, TargetKind};

/// A named check sequence bound to one target file.
#[derive(Debug)]
pub struct Inspection {
    name: String,
    target_path: String,
    checks: Vec<Check>,
}

impl Inspection {
    /// Create an inspection over `target_path` (bundle-relative).
    pub fn new(
        name: impl Into<String>,
        target_path: impl Into<String>,
        checks: Vec<Check>,
    ) -> Self {
        Self {
            name: name.into(),
            target_path: target_path.into(),
            checks,
        }
    }

    /// The name other versions address this inspection by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bundle-relative path this inspection examines.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// The configured checks, in execution order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run every check against the bundle at `bundle_root`.
    ///
    /// Returns a node labeled with the target path; check results are
    /// its children.
    ///
    /// # Errors
    ///
    /// Propagates only wiring-level [`FatalError`]s from checks;
    /// everything about the bundle itself lands in the report.
    pub fn run(&self, bundle_root: &Path) -> Result<ReportNode, FatalError> {
        tracing::debug!(
            inspection = %self.name,
            target = %self.target_path,
            "running inspection"
        );
        let mut node = ReportNode::labeled(&self.target_path);
        let relative = self.target_path.as_str();
        let mut remaining = self.checks.as_slice();

        if let Some((first, rest)) = remaining.split_first() {
            if first.is_existence_gate() {
                let present = first
                    .presence(bundle_root, relative)
                    .unwrap_or(false);
                let gate = first.run(CheckTarget::Path {
                    bundle_root,
                    relative,
                })?;
                node.add_child(gate);
                if !present {
                    // Failed when required, trivially passing otherwise.
                    return Ok(node);
                }
                remaining = rest;
            }
        }

        let mut loaded: Option<Value> = None;
        for check in remaining {
            match check.target_kind() {
                TargetKind::Path => {
                    let report = check.run(CheckTarget::Path {
                        bundle_root,
                        relative,
                    })?;
                    node.add_child(report);
                }
                TargetKind::Value => {
                    if loaded.is_none() {
                        match load_yaml(&bundle_root.join(relative)) {
                            Ok(value) => loaded = Some(value),
                            Err(e) => {
                                // The report entry is positional only;
                                // the parser's own message goes to the log.
                                if let Some(detail) = e.diagnostic() {
                                    tracing::debug!(
                                        diagnostic = detail,
                                        target = %relative,
                                        "YAML load failed"
                                    );
                                }
                                node.error(e.to_string());
                                return Ok(node);
                            }
                        }
                    }
                    if let Some(data) = loaded.as_ref() {
                        let report = check.run(CheckTarget::Value {
                            bundle_root,
                            data,
                        })?;
                        node.add_child(report);
                    }
                }
            }
        }
        Ok(node)
    }
}
