//! Tests for the canvas connection rules.
mod common;
use common::*;
use joken::prelude::*;

/// Start at the left with two condition nodes and an action in one row.
fn row_graph() -> WorkflowGraph {
    WorkflowGraph::new()
        .with_node(start_node("start", 0.0, 0.0))
        .with_node(node("cond-a", NodeKind::Condition, 300.0, 0.0))
        .with_node(node("cond-b", NodeKind::Condition, 300.0, 400.0))
        .with_node(node("action", NodeKind::Action, 600.0, 0.0))
        .with_node(node("far", NodeKind::Action, 900.0, 0.0))
}

fn check(graph: &WorkflowGraph, connection: ProposedConnection) -> Result<(), ConnectionRejection> {
    ConnectionValidator::default().check(graph, &connection)
}

#[test]
fn test_valid_left_to_right_connection() {
    let graph = row_graph();
    assert!(is_valid_connection(&graph, &ProposedConnection::new("start", "cond-a")));
    assert!(is_valid_connection(
        &graph,
        &ProposedConnection::new("cond-a", "action")
            .with_source_handle("yes")
            .with_target_handle("input")
    ));
}

#[test]
fn test_unknown_handles_are_rejected() {
    let graph = row_graph();
    let result = check(
        &graph,
        ProposedConnection::new("cond-a", "action").with_source_handle("maybe"),
    );
    assert!(matches!(result, Err(ConnectionRejection::InvalidHandle { .. })));

    let result = check(
        &graph,
        ProposedConnection::new("cond-a", "action").with_target_handle("output"),
    );
    assert!(matches!(result, Err(ConnectionRejection::InvalidHandle { .. })));
}

#[test]
fn test_empty_handles_are_allowed() {
    let graph = row_graph();
    let connection = ProposedConnection::new("cond-a", "action")
        .with_source_handle("")
        .with_target_handle("");
    assert_eq!(check(&graph, connection), Ok(()));
}

#[test]
fn test_missing_endpoint_is_rejected() {
    let graph = row_graph();
    assert_eq!(
        check(&graph, ProposedConnection::new("cond-a", "ghost")),
        Err(ConnectionRejection::UnknownNode("ghost".to_string()))
    );
}

#[test]
fn test_start_to_non_condition_is_always_rejected() {
    // The action sits well to the right with nothing in between, so only the kind rule applies.
    let graph = WorkflowGraph::new()
        .with_node(start_node("start", 0.0, 0.0))
        .with_node(node("action", NodeKind::Action, 1000.0, 900.0));

    let result = check(&graph, ProposedConnection::new("start", "action"));
    assert_eq!(
        result,
        Err(ConnectionRejection::StartTargetNotCondition {
            target_kind: NodeKind::Action
        })
    );
    assert_eq!(
        result.unwrap_err().advisory().as_deref(),
        Some("Start node can only connect to condition nodes")
    );
}

#[test]
fn test_target_must_clear_column_buffer() {
    let graph = WorkflowGraph::new()
        .with_node(node("a", NodeKind::Condition, 100.0, 0.0))
        .with_node(node("exactly-buffer", NodeKind::Action, 150.0, 0.0))
        .with_node(node("past-buffer", NodeKind::Action, 150.5, 0.0))
        .with_node(node("behind", NodeKind::Action, 20.0, 0.0));

    for target in ["exactly-buffer", "behind"] {
        let result = check(&graph, ProposedConnection::new("a", target));
        assert!(
            matches!(result, Err(ConnectionRejection::NotLeftToRight { .. })),
            "{} should be rejected",
            target
        );
        assert_eq!(result.unwrap_err().advisory(), None);
    }
    assert_eq!(check(&graph, ProposedConnection::new("a", "past-buffer")), Ok(()));
}

#[test]
fn test_skipping_an_intermediate_node_is_rejected() {
    let graph = row_graph();
    let result = check(&graph, ProposedConnection::new("cond-a", "far"));

    assert_eq!(
        result,
        Err(ConnectionRejection::SkipsIntermediate {
            skipped: vec!["action".to_string()]
        })
    );
    assert_eq!(
        result.unwrap_err().advisory().as_deref(),
        Some("Cannot skip over intermediate nodes")
    );
}

#[test]
fn test_removing_intermediate_node_allows_the_edge() {
    let mut graph = row_graph();
    graph.nodes.retain(|n| n.id != "action");

    assert_eq!(check(&graph, ProposedConnection::new("cond-a", "far")), Ok(()));
}

#[test]
fn test_moving_intermediate_out_of_row_band_allows_the_edge() {
    let mut graph = row_graph();
    graph.node_mut("action").unwrap().position.y = 200.0;
    assert_eq!(check(&graph, ProposedConnection::new("cond-a", "far")), Ok(()));

    graph.node_mut("action").unwrap().position.y = 199.0;
    assert!(check(&graph, ProposedConnection::new("cond-a", "far")).is_err());
}

#[test]
fn test_start_fan_out_is_limited_to_one_target() {
    let mut graph = row_graph().with_edge(edge("start", "cond-a"));

    let result = check(&graph, ProposedConnection::new("start", "cond-b"));
    assert_eq!(
        result,
        Err(ConnectionRejection::StartAlreadyConnected {
            existing_target: "cond-a".to_string()
        })
    );
    assert_eq!(
        result.unwrap_err().advisory().as_deref(),
        Some("Start node can only connect to one condition node")
    );

    // Re-proposing the existing target is not a second fan-out.
    assert_eq!(check(&graph, ProposedConnection::new("start", "cond-a")), Ok(()));

    graph.edges.clear();
    assert_eq!(check(&graph, ProposedConnection::new("start", "cond-b")), Ok(()));
}

#[test]
fn test_validator_does_not_touch_the_graph() {
    let graph = row_graph();
    let before = graph.clone();
    let _ = check(&graph, ProposedConnection::new("cond-a", "far"));
    let _ = check(&graph, ProposedConnection::new("start", "action"));
    assert_eq!(graph, before);
}

#[test]
fn test_custom_geometry() {
    let validator = ConnectionValidator::new(ValidatorConfig {
        column_buffer: 10.0,
        row_band: 50.0,
    });
    let graph = WorkflowGraph::new()
        .with_node(node("a", NodeKind::Condition, 0.0, 0.0))
        .with_node(node("mid", NodeKind::Action, 100.0, 60.0))
        .with_node(node("b", NodeKind::Action, 200.0, 0.0))
        .with_node(node("near", NodeKind::Action, 20.0, 300.0));

    assert!(validator.is_valid_connection(&graph, &ProposedConnection::new("a", "b")));
    assert!(validator.is_valid_connection(&graph, &ProposedConnection::new("a", "near")));
    assert!(!is_valid_connection(&graph, &ProposedConnection::new("a", "near")));
}
