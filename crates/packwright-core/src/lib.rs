//! # packwright-core — Foundational Types for Bundle Validation
//!
//! This crate is the bedrock of packwright. It defines the report tree that
//! every validation rule writes into, the dotted version type used for
//! platform-release ordering, the YAML document loader, and the fatal error
//! hierarchy. Every other crate in the workspace depends on
//! `packwright-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Two failure tiers.** Malformed bundle *content* is recorded as
//!    entries in a [`ReportNode`] and never aborts a run. Violated
//!    *engine invariants* (unknown package version, a schema that does not
//!    compile, a misconfigured rule set) surface as [`FatalError`] and
//!    abort immediately.
//!
//! 2. **Reports are plain values.** A [`ReportNode`] is built by the call
//!    that owns it and merged into its parent by value. There is no shared
//!    mutable report state anywhere in the engine.
//!
//! 3. **Numeric version ordering.** [`DottedVersion`] compares
//!    segment-by-segment as integers, so `"10.0"` sorts above `"8.0"`.
//!    Lexicographic comparison of release strings is a defect class this
//!    type removes by construction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `packwright-*` crates (this is the leaf of
//!   the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod loader;
pub mod report;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use error::FatalError;
pub use loader::{load_yaml, LoadError};
pub use report::{ReportEntry, ReportNode, Severity};
pub use version::DottedVersion;
