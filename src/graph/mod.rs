//! The workflow canvas model and the rules that gate its edits.
//!
//! Nodes and edges are plain data. [`ConnectionValidator`] decides which edges may be drawn,
//! [`validate_workflow`] decides whether a workflow may be saved, and [`WorkflowEditor`]
//! combines both into the state one open workflow needs.

pub mod connection;
pub mod editor;
pub mod migrate;
pub mod model;
pub mod validation;
pub mod workflow;

pub use connection::*;
pub use editor::*;
pub use migrate::*;
pub use model::*;
pub use validation::*;
pub use workflow::*;
