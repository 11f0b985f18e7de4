//! # Joken - Condition-to-Query Compiler for Workflow Canvases
//!
//! **Joken** turns the conditions a user authors on a marketing-automation workflow canvas
//! into query documents a data store can execute. It also owns the rules that keep the
//! canvas itself well-formed: which edges may be drawn and which workflows may be saved.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Conditions**: Build [`Condition`](condition::Condition)s in code or deserialize
//!     them from the flat JSON the condition editor produces.
//! 2.  **Assemble**: A [`QueryAssembler`](compiler::QueryAssembler) resolves each condition's
//!     collection, compiles its operator, and merges everything into one contacts-rooted
//!     [`QueryDocument`](query::QueryDocument).
//! 3.  **Gate the Canvas**: A [`ConnectionValidator`](graph::ConnectionValidator) accepts or
//!     rejects proposed edges, and [`validate_workflow`](graph::validate_workflow) reports the
//!     structural issues that block a save.
//!
//! Compilation never fails. Unknown fields fall back to the contacts collection and unknown
//! operators to an equality clause.
//!
//! ## Quick Start
//!
//! ```rust
//! use joken::prelude::*;
//!
//! let conditions = vec![
//!     Condition::new("c1", "point_balance", FieldKind::Number, Operator::GreaterThan, 1000)
//!         .with_collection(Collection::Contacts),
//!     Condition::new("c2", "net_amount", FieldKind::Number, Operator::GreaterThan, 20000)
//!         .with_logical_operator(LogicalOperator::And),
//! ];
//!
//! let assembler = QueryAssembler::builder()
//!     .with_merchant_id("merchant-42")
//!     .build();
//! let document = assembler.assemble(&conditions);
//!
//! assert_eq!(document.query.group_by, Some(vec!["user_id".to_string()]));
//! assert!(document.query.join("orders").is_some());
//! println!("{}", document);
//! ```

pub mod classifier;
pub mod compiler;
pub mod condition;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod query;
