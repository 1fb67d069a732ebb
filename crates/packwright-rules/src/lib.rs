//! # packwright-rules — Versioned Bundle Rule Sets
//!
//! Everything that decides whether a bundle is valid lives here:
//!
//! - [`check`] — the closed set of atomic checks (file existence, path
//!   masks, schema validation, version compatibility, ...).
//! - [`inspection`] — a named check sequence bound to one target file,
//!   with the existence gate and lazy single load.
//! - [`validator`] — an ordered set of inspections for one package
//!   format version; later versions derive from earlier ones through
//!   explicit add/remove/replace deltas applied once at construction.
//! - [`schemas`] — the embedded JSON Schemas per package version.
//! - [`versions`] — the per-version rule-set builders.
//! - [`mapping`] — the version table: package version to
//!   {templates, validator, builder}, and resolution from a bundle's
//!   own `metadata.yaml`.
//!
//! ## Composition Model
//!
//! Rule sets are data. Each version's validator is built once from the
//! previous version's inspection list plus a delta list; nothing is
//! inherited implicitly and every version's effective rule set is
//! enumerable and testable in isolation. Construction is fallible
//! (schemas must compile, deltas must name existing inspections) and
//! any failure is fatal before a single bundle file is read.

pub mod check;
pub mod inspection;
pub mod mapping;
pub mod schemas;
pub mod validator;
pub mod versions;

pub use check::{Check, CheckTarget};
pub use inspection::Inspection;
pub use mapping::{
    BuilderKind, VersionLookup, VersionMappingEntry, VersionTable, DEFAULT_PACKAGE_VERSION,
    METADATA_FILE,
};
pub use validator::{Delta, Validator};
