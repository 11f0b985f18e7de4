//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the joken crate.
//!
//! # Example
//!
//! ```rust
//! use joken::prelude::*;
//!
//! let condition: Condition = serde_json::from_str(
//!     r#"{"id": "c1", "field": "gender", "field_type": "select", "operator": "equals", "value": "female"}"#,
//! )?;
//! let document = assemble(&[condition]);
//! assert_eq!(
//!     document.to_value()?["contacts"]["where"]["and"][0],
//!     serde_json::json!({"gender": "FEMALE"})
//! );
//! # Ok::<(), serde_json::Error>(())
//! ```

// Condition model
pub use crate::condition::{
    Collection, Condition, ConditionValue, DateBounds, DateSpec, FieldKind, FieldType,
    LogicalOperator, Operator, PeriodUnit,
};

// Compilation
pub use crate::classifier::{FieldResolver, FieldTables};
pub use crate::compiler::{
    CompiledWorkflow, CompilerConfig, QueryAssembler, QueryAssemblerBuilder, assemble,
};
pub use crate::query::{Clause, Filter, QueryDocument};

// Workflow graph
pub use crate::graph::{
    ConnectionValidator, NodeKind, Position, ProposedConnection, ValidationReport,
    ValidatorConfig, Workflow, WorkflowEdge, WorkflowEditor, WorkflowGraph, WorkflowNode,
    is_valid_connection, load_workflow, validate_workflow,
};

// Error types
pub use crate::error::{ConnectionRejection, EditorError, WorkflowLoadError};
