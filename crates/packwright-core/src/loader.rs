//! # YAML Loader — Files to JSON Values
//!
//! Loads a YAML manifest from disk and converts it to a
//! `serde_json::Value` for schema validation. YAML has a richer type
//! system than JSON (tags, non-string keys), but bundle manifests use
//! only the JSON-compatible subset; anything outside it is a load error.
//!
//! Load errors are *reportable*, not fatal: the inspection that owns the
//! load records [`LoadError`]'s display form as a single error entry and
//! halts. The display forms are part of the user-facing report format,
//! including the `(line:column)` suffix when the parser exposes a
//! position. The parser's full message stays off the report;
//! [`LoadError::diagnostic`] exposes it for debug logging.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Error loading a YAML manifest.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML.
    #[error("Can't parse YAML file{}", position_suffix(.location))]
    Parse {
        /// The parser's own diagnostic.
        message: String,
        /// 1-based line and column, when the parser exposes them.
        location: Option<(usize, usize)>,
    },

    /// The YAML parsed but uses constructs JSON cannot represent
    /// (e.g. a non-scalar mapping key or a non-finite float).
    #[error("Unsupported YAML content: {reason}")]
    Unrepresentable {
        /// What could not be converted.
        reason: String,
    },
}

impl LoadError {
    /// The raw parser message, when the display form omits it.
    ///
    /// `Parse`'s display is positional only (report format); the full
    /// diagnostic is kept here for callers that log at debug level.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            LoadError::Parse { message, .. } => Some(message),
            _ => None,
        }
    }
}

fn position_suffix(location: &Option<(usize, usize)>) -> String {
    match location {
        Some((line, column)) => format!(", error position: ({line}:{column})"),
        None => String::new(),
    }
}

/// Load a YAML file and convert it to a JSON value.
///
/// An empty document loads as `Value::Null`; whether that is acceptable
/// is the caller's decision (rule sets opt in per file).
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read,
/// [`LoadError::Parse`] if it is not valid YAML, and
/// [`LoadError::Unrepresentable`] if the YAML has no JSON equivalent.
pub fn load_yaml(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| LoadError::Parse {
            message: e.to_string(),
            location: e.location().map(|l| (l.line(), l.column())),
        })?;
    yaml_to_json_value(&yaml)
        .map_err(|reason| LoadError::Unrepresentable { reason })
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are ignored and their inner value converted; non-string scalar
/// mapping keys are stringified the way YAML renders them.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> =
                seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(format!(
                            "unsupported YAML map key type: {other:?}"
                        ))
                    }
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ---- successful loads ----

    #[test]
    fn test_load_mapping_document() {
        let file = write_temp(
            "name: plugin_name\nversion: \"1.0.0\"\ncount: 3\nenabled: true\nitems:\n  - one\n  - two\n",
        );
        let value = load_yaml(file.path()).unwrap();
        assert_eq!(value["name"], "plugin_name");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["count"], 3);
        assert_eq!(value["enabled"], true);
        assert_eq!(value["items"][1], "two");
    }

    #[test]
    fn test_load_empty_document_is_null() {
        let file = write_temp("");
        assert_eq!(load_yaml(file.path()).unwrap(), Value::Null);
    }

    #[test]
    fn test_load_sequence_document() {
        let file = write_temp("- type: puppet\n- type: shell\n");
        let value = load_yaml(file.path()).unwrap();
        assert_eq!(value[0]["type"], "puppet");
        assert_eq!(value[1]["type"], "shell");
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let file = write_temp("1: one\ntrue: yes_value\n");
        let value = load_yaml(file.path()).unwrap();
        assert_eq!(value["1"], "one");
        assert_eq!(value["true"], "yes_value");
    }

    #[test]
    fn test_tagged_values_convert_to_inner() {
        let file = write_temp("key: !custom_tag inner\n");
        let value = load_yaml(file.path()).unwrap();
        assert_eq!(value["key"], "inner");
    }

    // ---- load errors ----

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_yaml(Path::new("/nonexistent/metadata.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().starts_with("I/O error: "));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let file = write_temp("key: value\nbroken line without colon continuation: [\n");
        let err = load_yaml(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("Can't parse YAML file"));
    }

    #[test]
    fn test_parse_error_position_format() {
        let err = LoadError::Parse {
            message: "mapping values are not allowed".to_string(),
            location: Some((4, 7)),
        };
        assert_eq!(
            err.to_string(),
            "Can't parse YAML file, error position: (4:7)"
        );
    }

    #[test]
    fn test_parse_error_without_position() {
        let err = LoadError::Parse {
            message: "scan error".to_string(),
            location: None,
        };
        assert_eq!(err.to_string(), "Can't parse YAML file");
    }

    #[test]
    fn test_parse_error_diagnostic_is_surfaced() {
        let file = write_temp("key: value\nbroken line without colon continuation: [\n");
        let err = load_yaml(file.path()).unwrap_err();
        let diagnostic = err.diagnostic().expect("parse errors keep the parser message");
        assert!(!diagnostic.is_empty());
        // The display form stays positional; the raw message is
        // accessor-only.
        assert!(!err.to_string().contains(diagnostic));
    }

    #[test]
    fn test_io_error_has_no_diagnostic() {
        let err = load_yaml(Path::new("/nonexistent/metadata.yaml")).unwrap_err();
        assert!(err.diagnostic().is_none());
    }
}
