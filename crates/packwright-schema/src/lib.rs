//! # packwright-schema — Schema Validation as Report Trees
//!
//! Adapts the `jsonschema` engine to the report model of
//! `packwright-core`. Three pieces:
//!
//! - [`engine`] — compiles a schema once and translates the engine's
//!   native error iterator into report children whose labels are
//!   ` -> `-joined breadcrumbs into the document.
//! - [`multi`] — validates a list of heterogeneous records, selecting
//!   each record's schema by its `type` discriminator field.
//! - [`format`] — an explicit registry of named value predicates with
//!   tagged verdicts; expected failures become report entries,
//!   predicate bugs become fatal errors.
//!
//! ## Failure Tiers
//!
//! Schema *compilation* failures are fatal: they are packaging defects,
//! not properties of the document under validation. Everything the
//! engine finds wrong with a document becomes report entries.

pub mod engine;
pub mod format;
pub mod multi;

pub use engine::CompiledSchema;
pub use format::{FormatRegistry, FormatVerdict};
pub use multi::multi_schema_report;
