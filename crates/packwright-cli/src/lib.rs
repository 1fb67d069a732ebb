//! # packwright-cli — Bundle Lifecycle Tooling
//!
//! Provides the `packwright` binary. Three mutually exclusive actions
//! cover the bundle lifecycle:
//!
//! - `packwright --create <name>` — scaffold a new bundle skeleton from
//!   the templates of a package version (see [`scaffold`]).
//! - `packwright --check <path>` — validate a bundle against the rule
//!   set its own `metadata.yaml` declares (see [`check`]).
//! - `packwright --build <path>` — validate, then package the bundle
//!   into a distributable archive (see [`build`]).
//!
//! ## Exit Codes
//!
//! Handlers return `0` on success and `1` when validation fails.
//! Engine misuse (an unsupported package version, a rule set that does
//! not construct) surfaces as an error on the diagnostic channel and
//! also exits `1`.
//!
//! ```bash
//! packwright --create my_bundle --package-version 5.0.0
//! packwright --check my_bundle
//! packwright --build my_bundle
//! ```

pub mod build;
pub mod check;
pub mod scaffold;

use packwright_core::ReportNode;

/// Print `report` and a one-line verdict, returning the exit code.
///
/// Clean reports go to stdout, failed ones to stderr, so scripted
/// callers can separate diagnostics from payload output.
pub fn print_verdict(report: &ReportNode) -> u8 {
    if report.is_failed() {
        eprintln!("{report}");
        eprintln!("Validation failed.");
        1
    } else {
        println!("{report}");
        println!("Validation successful.");
        0
    }
}
