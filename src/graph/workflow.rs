use super::model::WorkflowGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    #[serde(rename = "event-based")]
    EventBased,
    #[serde(rename = "schedule-based")]
    ScheduleBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Active,
    Paused,
}

impl WorkflowStatus {
    /// Active pauses; paused and draft workflows become active.
    pub fn toggled(self) -> Self {
        match self {
            WorkflowStatus::Active => WorkflowStatus::Paused,
            WorkflowStatus::Paused | WorkflowStatus::Draft => WorkflowStatus::Active,
        }
    }
}

/// A persisted workflow: the canvas graph plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger_type: TriggerType,
    #[serde(flatten)]
    pub graph: WorkflowGraph,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<DateTime<Utc>>,
}

/// The listing view of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub trigger_type: TriggerType,
    pub status: WorkflowStatus,
    pub node_count: usize,
    pub last_modified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<DateTime<Utc>>,
}

impl Workflow {
    /// A new, empty draft.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        trigger_type: TriggerType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            trigger_type,
            graph: WorkflowGraph::default(),
            created_at: now,
            updated_at: now,
            status: WorkflowStatus::Draft,
            last_triggered: None,
        }
    }

    pub fn with_graph(mut self, graph: WorkflowGraph) -> Self {
        self.graph = graph;
        self
    }

    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            trigger_type: self.trigger_type,
            status: self.status,
            node_count: self.graph.nodes.len(),
            last_modified: self.updated_at,
            last_triggered: self.last_triggered,
        }
    }

    /// A draft copy under a new id, never triggered.
    pub fn duplicate(&self, new_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id.into(),
            name: format!("{} (Copy)", self.name),
            created_at: now,
            updated_at: now,
            status: WorkflowStatus::Draft,
            last_triggered: None,
            ..self.clone()
        }
    }

    pub fn toggle_status(&mut self, now: DateTime<Utc>) {
        self.status = self.status.toggled();
        self.updated_at = now;
    }
}
