use crate::graph::NodeKind;
use thiserror::Error;

/// Reasons the canvas refuses a proposed connection, one per rule in checking order.
///
/// The `Display` text is what the user sees. Only some rejections are announced; see
/// [`ConnectionRejection::advisory`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionRejection {
    #[error("Cannot connect handle '{source_handle}' to handle '{target_handle}'")]
    InvalidHandle {
        source_handle: String,
        target_handle: String,
    },

    #[error("Node '{0}' does not exist in the workflow")]
    UnknownNode(String),

    #[error("Start node can only connect to one condition node")]
    StartAlreadyConnected { existing_target: String },

    #[error("Start node can only connect to condition nodes")]
    StartTargetNotCondition { target_kind: NodeKind },

    #[error("Node '{target_id}' must be placed to the right of node '{source_id}'")]
    NotLeftToRight { source_id: String, target_id: String },

    #[error("Cannot skip over intermediate nodes")]
    SkipsIntermediate { skipped: Vec<String> },
}

impl ConnectionRejection {
    /// The message to show the user, for rejections that are announced rather than silent.
    pub fn advisory(&self) -> Option<String> {
        match self {
            ConnectionRejection::StartAlreadyConnected { .. }
            | ConnectionRejection::StartTargetNotCondition { .. }
            | ConnectionRejection::SkipsIntermediate { .. } => Some(self.to_string()),
            ConnectionRejection::InvalidHandle { .. }
            | ConnectionRejection::UnknownNode(_)
            | ConnectionRejection::NotLeftToRight { .. } => None,
        }
    }
}

/// Errors raised while loading a persisted workflow document.
#[derive(Error, Debug)]
pub enum WorkflowLoadError {
    #[error("Workflow document must be a JSON object")]
    NotAnObject,

    #[error("Failed to parse workflow JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor operations that were refused. The workflow is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Node with id '{0}' already exists")]
    DuplicateNode(String),

    #[error("Node '{0}' not found")]
    UnknownNode(String),

    #[error("Connection '{0}' not found")]
    UnknownEdge(String),

    #[error("Start node '{0}' cannot be deleted")]
    StartNodeLocked(String),

    #[error(transparent)]
    Rejected(#[from] ConnectionRejection),
}
