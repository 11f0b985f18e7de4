use super::connection::{ConnectionValidator, ProposedConnection};
use super::model::{
    HANDLE_NO, HANDLE_YES, NodeData, NodeKind, Position, StartConfig, WorkflowEdge, WorkflowNode,
};
use super::validation::{ValidationIssue, validate_workflow};
use super::workflow::Workflow;
use crate::compiler::{CompiledWorkflow, QueryAssembler};
use crate::condition::Condition;
use crate::error::EditorError;
use chrono::{DateTime, Utc};
use tracing::debug;

pub const DEFAULT_START_NODE_ID: &str = "start-node";

/// Where a fresh canvas places its start node.
pub const DEFAULT_START_POSITION: Position = Position { x: 250.0, y: 200.0 };

/// Application state of one open workflow in the editor.
///
/// Handlers receive the editor by reference; refused operations leave the workflow unchanged.
pub struct WorkflowEditor {
    workflow: Workflow,
    validator: ConnectionValidator,
    assembler: QueryAssembler,
    selected_node: Option<String>,
    selected_edge: Option<String>,
    issues: Vec<ValidationIssue>,
    notice: Option<String>,
    dirty: bool,
}

impl WorkflowEditor {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow,
            validator: ConnectionValidator::default(),
            assembler: QueryAssembler::default(),
            selected_node: None,
            selected_edge: None,
            issues: Vec::new(),
            notice: None,
            dirty: false,
        }
    }

    pub fn with_validator(mut self, validator: ConnectionValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_assembler(mut self, assembler: QueryAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn into_workflow(self) -> Workflow {
        self.workflow
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Issues found by the last [`validate`](Self::validate) call.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// The pending user-facing message, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn selected_node(&self) -> Option<&WorkflowNode> {
        self.selected_node
            .as_deref()
            .and_then(|id| self.workflow.graph.node(id))
    }

    pub fn selected_edge(&self) -> Option<&WorkflowEdge> {
        self.selected_edge
            .as_deref()
            .and_then(|id| self.workflow.graph.edge(id))
    }

    pub fn select_node(&mut self, node_id: Option<&str>) {
        self.selected_node = node_id.map(str::to_string);
        self.selected_edge = None;
    }

    pub fn select_edge(&mut self, edge_id: Option<&str>) {
        self.selected_edge = edge_id.map(str::to_string);
        self.selected_node = None;
    }

    /// Adds the default start node when the canvas has none. Returns whether one was added.
    pub fn ensure_start_node(&mut self) -> bool {
        if self.workflow.graph.nodes_of_kind(NodeKind::Start).next().is_some() {
            return false;
        }

        let config = StartConfig {
            label: Some("Workflow Start".to_string()),
            description: Some("Beginning of workflow execution".to_string()),
            merchant_id: Some(String::new()),
            data_source: Some("CRM".to_string()),
        };
        let data = NodeData {
            description: Some("Workflow starting point".to_string()),
            config: serde_json::to_value(config).ok(),
            ..NodeData::new("Start")
        };
        let node = WorkflowNode::new(DEFAULT_START_NODE_ID, NodeKind::Start, DEFAULT_START_POSITION)
            .with_data(data);

        self.add_node(node).is_ok()
    }

    pub fn add_node(&mut self, node: WorkflowNode) -> Result<(), EditorError> {
        if self.workflow.graph.node(&node.id).is_some() {
            return Err(EditorError::DuplicateNode(node.id));
        }
        self.workflow.graph.nodes.push(node);
        self.dirty = true;
        Ok(())
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<(), EditorError> {
        let node = self
            .workflow
            .graph
            .node_mut(node_id)
            .ok_or_else(|| EditorError::UnknownNode(node_id.to_string()))?;
        node.position = position;
        self.dirty = true;
        Ok(())
    }

    /// Removes a node and every edge touching it. Start nodes cannot be removed.
    pub fn delete_node(&mut self, node_id: &str) -> Result<WorkflowNode, EditorError> {
        let graph = &mut self.workflow.graph;
        let index = graph
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| EditorError::UnknownNode(node_id.to_string()))?;
        if graph.nodes[index].kind == NodeKind::Start {
            return Err(EditorError::StartNodeLocked(node_id.to_string()));
        }

        let node = graph.nodes.remove(index);
        graph
            .edges
            .retain(|e| e.source != node_id && e.target != node_id);
        if self.selected_node.as_deref() == Some(node_id) {
            self.selected_node = None;
        }
        self.dirty = true;
        Ok(node)
    }

    pub fn set_conditions(
        &mut self,
        node_id: &str,
        conditions: Vec<Condition>,
    ) -> Result<(), EditorError> {
        let node = self
            .workflow
            .graph
            .node_mut(node_id)
            .ok_or_else(|| EditorError::UnknownNode(node_id.to_string()))?;
        node.data.conditions = conditions;
        self.dirty = true;
        Ok(())
    }

    /// Validates and adds an edge.
    ///
    /// A rejected connection leaves the graph untouched and, for announced rejections,
    /// stores the message as the pending notice.
    pub fn connect(&mut self, connection: ProposedConnection) -> Result<&WorkflowEdge, EditorError> {
        if let Err(rejection) = self.validator.check(&self.workflow.graph, &connection) {
            if let Some(message) = rejection.advisory() {
                self.notice = Some(message);
            }
            return Err(rejection.into());
        }

        let handle = connection.source_handle.as_deref().filter(|h| !h.is_empty());
        let id = self.unique_edge_id(&connection.source, &connection.target, handle);
        let label = match handle {
            Some(HANDLE_YES) => Some("Yes".to_string()),
            Some(HANDLE_NO) => Some("No".to_string()),
            _ => None,
        };

        debug!(edge_id = %id, "Connection added");
        let edges = &mut self.workflow.graph.edges;
        edges.push(WorkflowEdge {
            id,
            source: connection.source,
            target: connection.target,
            source_handle: handle.map(str::to_string),
            target_handle: connection.target_handle.filter(|h| !h.is_empty()),
            label,
            animated: true,
        });
        self.dirty = true;
        Ok(&edges[edges.len() - 1])
    }

    fn unique_edge_id(&self, source: &str, target: &str, handle: Option<&str>) -> String {
        let base = match handle {
            Some(handle) => format!("p{}-{}-{}", source, target, handle),
            None => format!("p{}-{}", source, target),
        };
        let taken = |id: &str| self.workflow.graph.edge(id).is_some();

        if !taken(&base) {
            return base;
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{}-{}", base, counter);
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    pub fn delete_edge(&mut self, edge_id: &str) -> Result<WorkflowEdge, EditorError> {
        let edges = &mut self.workflow.graph.edges;
        let index = edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| EditorError::UnknownEdge(edge_id.to_string()))?;
        let edge = edges.remove(index);
        if self.selected_edge.as_deref() == Some(edge_id) {
            self.selected_edge = None;
        }
        self.dirty = true;
        Ok(edge)
    }

    /// Runs the structural checks, keeps the issues, and reports whether saving is allowed.
    pub fn validate(&mut self) -> bool {
        let report = validate_workflow(&self.workflow.graph);
        let valid = report.is_valid();
        self.issues = report.issues;
        valid
    }

    pub fn compile(&self) -> CompiledWorkflow<'_> {
        self.assembler.compile_workflow(&self.workflow)
    }

    /// Records a successful save.
    pub fn mark_saved(&mut self, now: DateTime<Utc>) {
        self.workflow.updated_at = now;
        self.dirty = false;
    }
}
