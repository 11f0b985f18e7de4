use super::model::{HANDLE_NO, HANDLE_YES, NodeKind, WorkflowGraph, WorkflowNode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A structural problem found in a workflow. Only `Error` issues block saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl ValidationIssue {
    fn error(message: String, node_id: Option<&str>) -> Self {
        Self {
            message,
            severity: Severity::Error,
            node_id: node_id.map(str::to_string),
        }
    }

    fn warning(message: String, node_id: Option<&str>) -> Self {
        Self {
            message,
            severity: Severity::Warning,
            node_id: node_id.map(str::to_string),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}", tag, self.message)?;
        if let Some(node_id) = &self.node_id {
            write!(f, " (node: {})", node_id)?;
        }
        Ok(())
    }
}

/// The ordered list of issues found by [`validate_workflow`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when nothing blocks saving; warnings are allowed.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    /// e.g. `"2 errors, 1 warning"`
    pub fn summary(&self) -> String {
        let counts = self.issues.iter().counts_by(|i| i.severity);
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{} {}", n, word)
            } else {
                format!("{} {}s", n, word)
            }
        };
        [
            (Severity::Error, "error"),
            (Severity::Warning, "warning"),
        ]
        .into_iter()
        .filter_map(|(severity, word)| counts.get(&severity).map(|n| plural(*n, word)))
        .join(", ")
    }
}

/// Checks the structure of a workflow graph before it is saved.
pub fn validate_workflow(graph: &WorkflowGraph) -> ValidationReport {
    let mut issues = Vec::new();

    let start_nodes: Vec<&WorkflowNode> = graph.nodes_of_kind(NodeKind::Start).collect();
    match start_nodes.len() {
        0 => issues.push(ValidationIssue::error(
            "Workflow must have a start node".to_string(),
            None,
        )),
        1 => {}
        _ => issues.push(ValidationIssue::warning(
            "Workflow should have only one start node".to_string(),
            None,
        )),
    }

    for node in &start_nodes {
        check_start_node(node, &mut issues);
    }

    for node in &graph.nodes {
        if node.kind != NodeKind::Start && !graph.has_incoming(&node.id) {
            issues.push(ValidationIssue::warning(
                format!("Node \"{}\" has no incoming connections", node.label()),
                Some(&node.id),
            ));
        }
        if node.kind == NodeKind::Condition {
            check_condition_node(graph, node, &mut issues);
        }
    }

    ValidationReport { issues }
}

fn check_start_node(node: &WorkflowNode, issues: &mut Vec<ValidationIssue>) {
    let Some(config) = node.data.start_config() else {
        issues.push(ValidationIssue::error(
            format!("Start node \"{}\" is missing configuration", node.label()),
            Some(&node.id),
        ));
        return;
    };

    if config.data_source.as_deref().is_none_or(str::is_empty) {
        issues.push(ValidationIssue::error(
            format!("Start node \"{}\" must specify a data source", node.label()),
            Some(&node.id),
        ));
    }
}

fn check_condition_node(graph: &WorkflowGraph, node: &WorkflowNode, issues: &mut Vec<ValidationIssue>) {
    let label = node.label();
    let id = Some(node.id.as_str());

    if !graph.outgoing(&node.id).any(|e| e.leaves_through(HANDLE_YES)) {
        issues.push(ValidationIssue::error(
            format!("Condition node \"{}\" must have a Yes branch connected", label),
            id,
        ));
    }
    if !graph.outgoing(&node.id).any(|e| e.leaves_through(HANDLE_NO)) {
        issues.push(ValidationIssue::warning(
            format!("Condition node \"{}\" has no No branch connected", label),
            id,
        ));
    }

    let conditions = &node.data.conditions;
    if conditions.is_empty() {
        issues.push(ValidationIssue::error(
            format!("Condition node \"{}\" must have at least one condition", label),
            id,
        ));
    }

    for (index, condition) in conditions.iter().enumerate() {
        let position = index + 1;
        if condition.data_source.as_deref().is_none_or(str::is_empty) {
            issues.push(ValidationIssue::error(
                format!("Condition {} in \"{}\" must specify a data source", position, label),
                id,
            ));
        }
        if condition.field.is_empty() {
            issues.push(ValidationIssue::error(
                format!("Condition {} in \"{}\" must specify a field", position, label),
                id,
            ));
        }
        if !condition.operator.is_unary() && condition.value.is_blank() {
            issues.push(ValidationIssue::error(
                format!(
                    "Condition {} in \"{}\" must specify a value for operator \"{}\"",
                    position, label, condition.operator
                ),
                id,
            ));
        }
    }
}
