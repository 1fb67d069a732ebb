//! # Fatal Errors — Engine Invariant Violations
//!
//! Defines [`FatalError`], the non-recoverable tier of the two-tier error
//! model. Malformed bundle *content* never appears here; it is recorded in
//! the report tree. `FatalError` is reserved for conditions under which no
//! meaningful report can be produced: an unknown package format version,
//! a schema that does not compile, a misconfigured rule set. These abort
//! the run and propagate to the CLI for process-level handling.

use thiserror::Error;

/// Non-recoverable engine error.
#[derive(Error, Debug)]
pub enum FatalError {
    /// The declared package version has no entry in the version table.
    /// No rule set exists, so no report can be produced.
    #[error("Wrong package version \"{version}\"")]
    WrongPackageVersion {
        /// The unrecognized version string (empty when the field is absent).
        version: String,
    },

    /// An embedded schema failed to compile. Always a packaging defect,
    /// never a property of the bundle under validation.
    #[error("schema {schema:?} failed to compile: {reason}")]
    SchemaCompile {
        /// Identifier of the schema that failed.
        schema: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A schema referenced a format checker that is not registered.
    #[error("unknown format checker {name:?}")]
    UnknownFormat {
        /// The requested format name.
        name: String,
    },

    /// A format predicate failed in a way it never should for any input.
    #[error("format checker {name:?} failed: {reason}")]
    FormatChecker {
        /// The format checker that misbehaved.
        name: String,
        /// What went wrong inside the predicate.
        reason: String,
    },

    /// A version's rule set could not be composed, e.g. a delta removed
    /// or replaced an inspection name that does not exist.
    #[error("rule set for version {version:?} is invalid: {reason}")]
    RuleSet {
        /// The package version whose rule set failed to compose.
        version: String,
        /// Why composition failed.
        reason: String,
    },

    /// A check was handed the wrong target kind (a path where it needs a
    /// parsed value, or vice versa). A wiring bug in the rule set.
    #[error("check {check} expects a {expected} target")]
    WrongTarget {
        /// Short description of the check.
        check: String,
        /// The target kind the check requires.
        expected: &'static str,
    },

    /// A path mask did not translate to a matchable pattern.
    #[error("path mask {mask:?} is invalid: {reason}")]
    BadPathMask {
        /// The mask as configured.
        mask: String,
        /// Why it could not be translated.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_package_version_message() {
        let err = FatalError::WrongPackageVersion {
            version: "9.9.9".to_string(),
        };
        assert_eq!(err.to_string(), "Wrong package version \"9.9.9\"");
    }

    #[test]
    fn test_wrong_package_version_empty_field() {
        let err = FatalError::WrongPackageVersion {
            version: String::new(),
        };
        assert_eq!(err.to_string(), "Wrong package version \"\"");
    }

    #[test]
    fn test_schema_compile_message_names_schema() {
        let err = FatalError::SchemaCompile {
            schema: "metadata".to_string(),
            reason: "unresolved reference".to_string(),
        };
        assert!(err.to_string().contains("metadata"));
        assert!(err.to_string().contains("unresolved reference"));
    }
}
