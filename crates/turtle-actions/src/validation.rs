//! Pre-execution checks of tree definitions.
//!
//! Findings come in three tiers: `critical` blocks execution, `warnings` flag parameters outside
//! catalog ranges, and `suggestions` are advisory structure notes.

use std::collections::BTreeSet;

use serde::Serialize;
use turtle_bt::Node;
use turtle_core::TurtleDriver;

use crate::catalog::{ActionCatalog, Resources};
use crate::definition::{NodeSpec, TreeSpec};
use crate::registry::{is_control_node, ActionRegistry};

/// Above this many leaf actions a tree is hard to follow.
pub const MAX_ACTIONS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    pub tree: String,
    pub valid: bool,
    pub critical: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    /// Topics and services the tree's actions depend on.
    pub resources: Resources,
}

impl CheckReport {
    fn new(tree: &str) -> Self {
        Self {
            tree: tree.to_string(),
            ..Self::default()
        }
    }

    pub fn failed(tree: &str, reason: impl Into<String>) -> Self {
        let mut report = Self::new(tree);
        report.critical.push(reason.into());
        report
    }

    fn finish(mut self) -> Self {
        self.valid = self.critical.is_empty();
        self
    }
}

/// Structural checks of a constructed tree: empty composites, duplicate names, action count.
pub fn check_tree<D>(tree: &str, root: &Node<D>) -> CheckReport
where
    D: TurtleDriver,
{
    let mut report = CheckReport::new(tree);
    structure(root, &mut report);
    report.finish()
}

fn structure<D>(root: &Node<D>, report: &mut CheckReport)
where
    D: TurtleDriver,
{
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    let mut actions = 0usize;

    root.walk(&mut |node, _depth| {
        if !seen.insert(node.name()) {
            duplicates.insert(node.name());
        }
        if !node.kind().is_composite() {
            actions += 1;
        } else if node.children().is_empty() {
            report
                .critical
                .push(format!("{:?} `{}` has no children", node.kind(), node.name()));
        }
    });

    if !duplicates.is_empty() {
        let names: Vec<&str> = duplicates.into_iter().take(5).collect();
        report.suggestions.push(format!(
            "Duplicate node names found: {} - may complicate debugging",
            names.join(", ")
        ));
    }
    if actions == 0 {
        report
            .suggestions
            .push("Tree has no leaf actions and will not move the turtle".to_string());
    } else if actions > MAX_ACTIONS {
        report.suggestions.push(format!(
            "Tree has {actions} leaf actions (more than {MAX_ACTIONS}) - consider splitting it"
        ));
    }
}

/// Check a definition against the catalog and registry, then build it and check its structure.
pub fn check_definition<D>(
    spec: &TreeSpec,
    catalog: &ActionCatalog,
    registry: &ActionRegistry<D>,
) -> CheckReport
where
    D: TurtleDriver,
{
    let mut report = CheckReport::new(&spec.name);
    let mut without_memory = 0usize;

    spec.walk(&mut |node, _depth| {
        if !registry.contains(&node.kind) {
            report.critical.push(format!(
                "Unknown action `{}` at node `{}`",
                node.kind,
                node.display_name()
            ));
        } else if is_control_node(&node.kind) {
            if node.flag("memory") == Some(false) {
                without_memory += 1;
            }
        } else {
            check_params(node, catalog, &mut report);
        }
    });

    if without_memory > 0 {
        report.suggestions.push(format!(
            "Found {without_memory} Sequence/Selector node(s) with `memory: false` - they re-run \
             already-succeeded children on every tick"
        ));
    }

    if report.critical.is_empty() {
        match registry.build_tree(spec) {
            Ok(root) => structure(&root, &mut report),
            Err(err) => report.critical.push(err.to_string()),
        }
    }

    tracing::debug!(
        tree = %spec.name,
        critical = report.critical.len(),
        warnings = report.warnings.len(),
        "definition checked"
    );
    report.finish()
}

fn check_params(node: &NodeSpec, catalog: &ActionCatalog, report: &mut CheckReport) {
    let Some(entry) = catalog.get(&node.kind) else {
        report.warnings.push(format!(
            "Action `{}` is not listed in the action catalog",
            node.kind
        ));
        return;
    };
    report.resources.merge(&entry.resources);

    for param in &entry.parameters {
        let Some(value) = node.number(&param.name) else {
            continue;
        };
        if !param.in_range(value) {
            report.warnings.push(format!(
                "`{}`: {} = {} is outside [{}, {}]",
                node.display_name(),
                param.name,
                value,
                param.min.map_or("-inf".to_string(), |v| v.to_string()),
                param.max.map_or("inf".to_string(), |v| v.to_string()),
            ));
        }
    }
}
