//! # Format Registry — Named Value Predicates
//!
//! An explicit registry mapping format names to predicates over JSON
//! values. Rule sets look predicates up by name; there is no ambient
//! global registration.
//!
//! ## Verdicts vs Bugs
//!
//! A predicate returns a tagged [`FormatVerdict`] for the outcomes it is
//! *expected* to produce: `Pass`, or `Fail` with the cause attached
//! (which the calling check records as an error entry). A predicate
//! returning `Err` signals a bug in the predicate itself; the registry
//! converts that to [`FatalError::FormatChecker`] and the run aborts.

use std::collections::HashMap;
use std::fmt;

use packwright_core::FatalError;
use regex::Regex;
use serde_json::Value;

/// Pattern a plain (non-regex) role identifier must match.
pub const ROLE_PATTERN: &str = r"^[0-9a-zA-Z_-]+$|^\*$";

/// Name under which the role-format predicate is registered.
pub const TASK_ROLE_FORMAT: &str = "task_role";

/// Outcome of a format predicate on one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatVerdict {
    /// The value conforms to the format.
    Pass,
    /// The value does not conform; `cause` explains why.
    Fail {
        /// Explanation attached to the resulting report entry.
        cause: String,
    },
}

impl FormatVerdict {
    /// True for [`FormatVerdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, FormatVerdict::Pass)
    }
}

type Predicate = Box<dyn Fn(&Value) -> Result<FormatVerdict, String> + Send + Sync>;

/// Registry of named format predicates.
///
/// Constructed once at startup and shared read-only across all
/// validation runs (`Send + Sync`, typically behind an `Arc`).
pub struct FormatRegistry {
    checkers: HashMap<String, Predicate>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// Create a registry with the built-in predicates registered.
    ///
    /// Currently one: [`TASK_ROLE_FORMAT`], which accepts `*`, plain
    /// identifiers matching [`ROLE_PATTERN`], `/…/`-enclosed strings
    /// that compile as regular expressions, and arrays of those.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::FormatChecker`] if a built-in pattern fails
    /// to compile.
    pub fn with_builtins() -> Result<Self, FatalError> {
        let role = Regex::new(ROLE_PATTERN).map_err(|e| FatalError::FormatChecker {
            name: TASK_ROLE_FORMAT.to_string(),
            reason: format!("role pattern failed to compile: {e}"),
        })?;
        let mut registry = Self::new();
        registry.register(TASK_ROLE_FORMAT, move |value| {
            Ok(check_task_role(&role, value))
        });
        Ok(registry)
    }

    /// Register a predicate under `name`, replacing any existing one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> Result<FormatVerdict, String> + Send + Sync + 'static,
    ) {
        self.checkers.insert(name.into(), Box::new(predicate));
    }

    /// Returns the registered format names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checkers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the named predicate against `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::UnknownFormat`] when no predicate is
    /// registered under `name`, and [`FatalError::FormatChecker`] when
    /// the predicate itself fails.
    pub fn check(&self, name: &str, value: &Value) -> Result<FormatVerdict, FatalError> {
        let predicate = self
            .checkers
            .get(name)
            .ok_or_else(|| FatalError::UnknownFormat {
                name: name.to_string(),
            })?;
        predicate(value).map_err(|reason| FatalError::FormatChecker {
            name: name.to_string(),
            reason,
        })
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("checkers", &self.names())
            .finish()
    }
}

/// Check one role value: a string or an array of strings.
fn check_task_role(role: &Regex, value: &Value) -> FormatVerdict {
    match value {
        Value::String(s) => check_role_string(role, s),
        Value::Array(items) => {
            for item in items {
                let verdict = match item {
                    Value::String(s) => check_role_string(role, s),
                    other => role_failure(other),
                };
                if !verdict.is_pass() {
                    return verdict;
                }
            }
            FormatVerdict::Pass
        }
        other => role_failure(other),
    }
}

/// A `/…/`-enclosed string is valid iff its body compiles as a regular
/// expression; anything else must match [`ROLE_PATTERN`].
fn check_role_string(role: &Regex, s: &str) -> FormatVerdict {
    if s.len() >= 2 && s.starts_with('/') && s.ends_with('/') {
        match Regex::new(&s[1..s.len() - 1]) {
            Ok(_) => FormatVerdict::Pass,
            Err(_) => role_failure(&Value::String(s.to_string())),
        }
    } else if role.is_match(s) {
        FormatVerdict::Pass
    } else {
        role_failure(&Value::String(s.to_string()))
    }
}

fn role_failure(got: &Value) -> FormatVerdict {
    FormatVerdict::Fail {
        cause: format!(
            "Task role field should be either a valid regexp enclosed \
             by slashes or a string of '{ROLE_PATTERN}' or an array \
             of those. Got {got} instead"
        ),
    }
}
