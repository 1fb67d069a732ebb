//! # Report Tree — Hierarchical Validation Results
//!
//! Defines [`ReportNode`], the ordered, severity-tagged accumulator that
//! every check and inspection writes into. A validation run produces one
//! tree; the CLI renders it and maps [`ReportNode::is_failed`] to the
//! process exit code.
//!
//! ## Invariant
//!
//! A node is *failed* iff it carries at least one `error` entry or any
//! descendant does. Warnings and infos never fail a node.
//!
//! ## Ownership
//!
//! Nodes are built by the call that owns them and merged into parents by
//! value. Nothing mutates a node after its owning call returns, so trees
//! compare with `==` and re-running a rule set over unchanged input yields
//! a structurally identical tree.

use std::fmt;

/// Severity of a single report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note; never affects failure.
    Info,
    /// Something suspicious that does not block the bundle.
    Warning,
    /// A violation; fails the node and every ancestor.
    Error,
}

impl Severity {
    /// Uppercase tag used by [`ReportNode::render`].
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// A single severity-tagged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Entry severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// One node of the hierarchical validation report.
///
/// The `label` is typically a file path or a breadcrumb into a document
/// (e.g. `releases -> 0 -> mode`). Unlabeled nodes are transparent
/// grouping nodes: they render their entries and children at the parent's
/// indentation level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportNode {
    label: Option<String>,
    entries: Vec<ReportEntry>,
    children: Vec<ReportNode>,
}

impl ReportNode {
    /// Create an empty, unlabeled node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty node with a label.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the node label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the node's own entries in insertion order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Returns the node's children in insertion order.
    pub fn children(&self) -> &[ReportNode] {
        &self.children
    }

    /// Append an `error` entry.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Append a `warning` entry.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    /// Append an `info` entry.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.push(ReportEntry {
            severity,
            message: message.into(),
        });
    }

    /// Append a child node, preserving insertion order.
    pub fn add_child(&mut self, child: ReportNode) {
        self.children.push(child);
    }

    /// Append several child nodes, preserving their order.
    pub fn add_children(&mut self, children: impl IntoIterator<Item = ReportNode>) {
        self.children.extend(children);
    }

    /// True iff this node or any descendant carries an `error` entry.
    ///
    /// Computed on demand; trees are small and short-lived.
    pub fn is_failed(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.severity == Severity::Error)
            || self.children.iter().any(ReportNode::is_failed)
    }

    /// Count entries of the given severity in this node and all descendants.
    pub fn count(&self, severity: Severity) -> usize {
        let own = self
            .entries
            .iter()
            .filter(|e| e.severity == severity)
            .count();
        own + self
            .children
            .iter()
            .map(|c| c.count(severity))
            .sum::<usize>()
    }

    /// Render the tree as indented text for terminal display.
    ///
    /// Each labeled node prints its label once, then its entries
    /// (`ERROR: `, `WARNING: `, `INFO: ` prefixes), then its children,
    /// each indented two spaces deeper. Unlabeled nodes contribute their
    /// entries and children at the current level.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.render_into(&mut lines, 0);
        lines.join("\n")
    }

    fn render_into(&self, lines: &mut Vec<String>, depth: usize) {
        let inner_depth = match &self.label {
            Some(label) => {
                lines.push(format!("{}{label}", "  ".repeat(depth)));
                depth + 1
            }
            None => depth,
        };
        for entry in &self.entries {
            lines.push(format!(
                "{}{}: {}",
                "  ".repeat(inner_depth),
                entry.severity.tag(),
                entry.message
            ));
        }
        for child in &self.children {
            child.render_into(lines, inner_depth);
        }
    }
}

impl fmt::Display for ReportNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_error() -> ReportNode {
        let mut node = ReportNode::new();
        node.error("boom");
        node
    }

    // ---- failure predicate ----

    #[test]
    fn test_new_node_is_not_failed() {
        assert!(!ReportNode::new().is_failed());
        assert!(!ReportNode::labeled("metadata.yaml").is_failed());
    }

    #[test]
    fn test_error_entry_fails_node() {
        assert!(node_with_error().is_failed());
    }

    #[test]
    fn test_warning_and_info_do_not_fail() {
        let mut node = ReportNode::new();
        node.warning("suspicious");
        node.info("note");
        assert!(!node.is_failed());
    }

    #[test]
    fn test_child_failure_propagates_to_root() {
        let mut middle = ReportNode::labeled("middle");
        middle.add_child(node_with_error());
        let mut root = ReportNode::labeled("root");
        root.add_child(ReportNode::labeled("clean sibling"));
        root.add_child(middle);
        assert!(root.is_failed());
    }

    #[test]
    fn test_deep_tree_without_errors_is_not_failed() {
        let mut leaf = ReportNode::labeled("leaf");
        leaf.warning("just a warning");
        let mut middle = ReportNode::new();
        middle.add_child(leaf);
        let mut root = ReportNode::labeled("root");
        root.info("fine");
        root.add_child(middle);
        assert!(!root.is_failed());
    }

    // ---- entry and child bookkeeping ----

    #[test]
    fn test_entries_preserve_insertion_order() {
        let mut node = ReportNode::new();
        node.info("first");
        node.error("second");
        node.warning("third");
        let severities: Vec<Severity> =
            node.entries().iter().map(|e| e.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Info, Severity::Error, Severity::Warning]
        );
    }

    #[test]
    fn test_add_children_preserves_order() {
        let mut root = ReportNode::new();
        root.add_children(vec![
            ReportNode::labeled("a"),
            ReportNode::labeled("b"),
            ReportNode::labeled("c"),
        ]);
        let labels: Vec<&str> =
            root.children().iter().filter_map(ReportNode::label).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_count_is_recursive() {
        let mut leaf = ReportNode::new();
        leaf.error("one");
        leaf.warning("two");
        let mut root = ReportNode::labeled("root");
        root.error("three");
        root.add_child(leaf);
        assert_eq!(root.count(Severity::Error), 2);
        assert_eq!(root.count(Severity::Warning), 1);
        assert_eq!(root.count(Severity::Info), 0);
    }

    // ---- rendering ----

    #[test]
    fn test_render_labeled_node_indents_entries() {
        let mut node = ReportNode::labeled("metadata.yaml");
        node.error("File not exists");
        assert_eq!(node.render(), "metadata.yaml\n  ERROR: File not exists");
    }

    #[test]
    fn test_render_unlabeled_node_keeps_level() {
        let mut inner = ReportNode::new();
        inner.warning("deprecated");
        let mut root = ReportNode::labeled("tasks.yaml");
        root.add_child(inner);
        assert_eq!(root.render(), "tasks.yaml\n  WARNING: deprecated");
    }

    #[test]
    fn test_render_nested_labels() {
        let mut grandchild = ReportNode::labeled("releases -> 0");
        grandchild.error("bad record");
        let mut child = ReportNode::labeled("metadata.yaml");
        child.add_child(grandchild);
        let mut root = ReportNode::labeled("/tmp/bundle");
        root.add_child(child);
        assert_eq!(
            root.render(),
            "/tmp/bundle\n  metadata.yaml\n    releases -> 0\n      ERROR: bad record"
        );
    }

    #[test]
    fn test_render_all_severity_prefixes() {
        let mut node = ReportNode::new();
        node.info("i");
        node.warning("w");
        node.error("e");
        assert_eq!(node.render(), "INFO: i\nWARNING: w\nERROR: e");
    }

    #[test]
    fn test_display_matches_render() {
        let mut node = ReportNode::labeled("x");
        node.info("y");
        assert_eq!(format!("{node}"), node.render());
    }

    // ---- idempotence ----

    #[test]
    fn test_identical_construction_compares_equal() {
        let build = || {
            let mut node = ReportNode::labeled("volumes.yaml");
            node.error("schema mismatch");
            let mut child = ReportNode::labeled("volumes -> 1");
            child.warning("odd but legal");
            node.add_child(child);
            node
        };
        assert_eq!(build(), build());
    }
}
