use super::model::{
    HANDLE_INPUT, HANDLE_NO, HANDLE_OUTPUT, HANDLE_YES, NodeKind, WorkflowGraph, WorkflowNode,
};
use crate::error::ConnectionRejection;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SOURCE_HANDLES: &[&str] = &[HANDLE_OUTPUT, HANDLE_YES, HANDLE_NO];
const TARGET_HANDLES: &[&str] = &[HANDLE_INPUT];

/// An edge the user is trying to draw.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProposedConnection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl ProposedConnection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }
}

/// Geometry of the left-to-right layout rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Horizontal gap a target must clear beyond its source.
    pub column_buffer: f64,
    /// Vertical distance from the source within which nodes count as the same row.
    pub row_band: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            column_buffer: 50.0,
            row_band: 200.0,
        }
    }
}

/// Gates edge creation on the canvas.
///
/// The validator keeps no state between calls; every check runs against the graph
/// snapshot it is given.
#[derive(Debug, Clone, Default)]
pub struct ConnectionValidator {
    config: ValidatorConfig,
}

fn handle_allowed(handle: Option<&str>, allowed: &[&str]) -> bool {
    match handle {
        None | Some("") => true,
        Some(h) => allowed.contains(&h),
    }
}

impl ConnectionValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Checks the rules in order and reports the first one broken.
    pub fn check(
        &self,
        graph: &WorkflowGraph,
        connection: &ProposedConnection,
    ) -> Result<(), ConnectionRejection> {
        let result = self.check_rules(graph, connection);
        if let Err(rejection) = &result {
            debug!(
                source = %connection.source,
                target = %connection.target,
                reason = %rejection,
                "Connection rejected"
            );
        }
        result
    }

    /// Same as [`check`](Self::check), reduced to a yes/no answer.
    pub fn is_valid_connection(
        &self,
        graph: &WorkflowGraph,
        connection: &ProposedConnection,
    ) -> bool {
        self.check(graph, connection).is_ok()
    }

    fn check_rules(
        &self,
        graph: &WorkflowGraph,
        connection: &ProposedConnection,
    ) -> Result<(), ConnectionRejection> {
        let source_handle = connection.source_handle.as_deref();
        let target_handle = connection.target_handle.as_deref();
        if !handle_allowed(source_handle, SOURCE_HANDLES)
            || !handle_allowed(target_handle, TARGET_HANDLES)
        {
            return Err(ConnectionRejection::InvalidHandle {
                source_handle: source_handle.unwrap_or_default().to_string(),
                target_handle: target_handle.unwrap_or_default().to_string(),
            });
        }

        let source = graph
            .node(&connection.source)
            .ok_or_else(|| ConnectionRejection::UnknownNode(connection.source.clone()))?;
        let target = graph
            .node(&connection.target)
            .ok_or_else(|| ConnectionRejection::UnknownNode(connection.target.clone()))?;

        if source.kind == NodeKind::Start {
            if let Some(existing) = graph
                .outgoing(&source.id)
                .find(|edge| edge.target != target.id)
            {
                return Err(ConnectionRejection::StartAlreadyConnected {
                    existing_target: existing.target.clone(),
                });
            }
            if target.kind != NodeKind::Condition {
                return Err(ConnectionRejection::StartTargetNotCondition {
                    target_kind: target.kind,
                });
            }
        }

        if target.position.x <= source.position.x + self.config.column_buffer {
            return Err(ConnectionRejection::NotLeftToRight {
                source_id: source.id.clone(),
                target_id: target.id.clone(),
            });
        }

        let skipped: Vec<String> = self
            .nodes_between(graph, source, target)
            .map(|node| node.id.clone())
            .collect();
        if !skipped.is_empty() {
            return Err(ConnectionRejection::SkipsIntermediate { skipped });
        }

        Ok(())
    }

    /// Nodes strictly inside the horizontal gap between `source` and `target` that sit in
    /// the source's row band.
    fn nodes_between<'a>(
        &'a self,
        graph: &'a WorkflowGraph,
        source: &'a WorkflowNode,
        target: &'a WorkflowNode,
    ) -> impl Iterator<Item = &'a WorkflowNode> {
        let buffer = self.config.column_buffer;
        let left = source.position.x + buffer;
        let right = target.position.x - buffer;

        graph.nodes.iter().filter(move |node| {
            node.id != source.id
                && node.id != target.id
                && node.position.x > left
                && node.position.x < right
                && (node.position.y - source.position.y).abs() < self.config.row_band
        })
    }
}

/// Validates a proposed edge with the default layout geometry.
pub fn is_valid_connection(graph: &WorkflowGraph, connection: &ProposedConnection) -> bool {
    ConnectionValidator::default().is_valid_connection(graph, connection)
}
