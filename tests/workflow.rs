//! Tests for persisted workflows: loading, structural validation, editing and compilation.
mod common;
use common::*;
use joken::graph::{
    DEFAULT_START_NODE_ID, HANDLE_YES, Severity, TriggerType, WorkflowStatus, migrate_document,
};
use joken::prelude::*;
use serde_json::json;

fn messages(report: &ValidationReport) -> Vec<&str> {
    report.issues.iter().map(|i| i.message.as_str()).collect()
}

#[test]
fn test_legacy_workflow_is_migrated_on_load() {
    let workflow = load_workflow(LEGACY_WORKFLOW_JSON).expect("Failed to load legacy workflow");

    assert_eq!(workflow.id, "sample-7");
    assert_eq!(workflow.trigger_type, TriggerType::EventBased);
    assert_eq!(workflow.status, WorkflowStatus::Active);
    assert_eq!(workflow.created_at, fixed_time());
    assert_eq!(workflow.graph.nodes.len(), 4);
    assert_eq!(workflow.graph.edges.len(), 3);

    // The start node's kind came from `data.type`.
    let start = workflow.graph.node("start-7").unwrap();
    assert_eq!(start.kind, NodeKind::Start);
    let config = start.data.start_config().unwrap();
    assert_eq!(config.merchant_id.as_deref(), Some("SHOP001"));
    assert_eq!(config.data_source.as_deref(), Some("CRM"));

    let condition = &workflow.graph.node("condition-7").unwrap().data.conditions[0];
    assert_eq!(condition.field_type(), FieldType::Number);
    assert_eq!(condition.data_source.as_deref(), Some("CRM"));
    assert_eq!(condition.collection, Some(Collection::Contacts));

    let yes = workflow.graph.edge("e46-yes").unwrap();
    assert!(yes.leaves_through(HANDLE_YES));
}

#[test]
fn test_current_layout_is_left_unchanged_by_migration() {
    let workflow = create_simple_workflow();
    let document = serde_json::to_value(&workflow).unwrap();

    assert_eq!(migrate_document(document.clone()).unwrap(), document);
    assert_eq!(load_workflow(&document.to_string()).unwrap(), workflow);
}

#[test]
fn test_current_key_wins_over_legacy_key() {
    let migrated = migrate_document(json!({"nodes": [], "actions": [{"id": "old"}]})).unwrap();
    assert_eq!(migrated, json!({"nodes": []}));
}

#[test]
fn test_non_object_document_is_rejected() {
    assert!(matches!(
        load_workflow("[1, 2, 3]"),
        Err(WorkflowLoadError::NotAnObject)
    ));
    assert!(matches!(
        load_workflow("{not json"),
        Err(WorkflowLoadError::Json(_))
    ));
}

#[test]
fn test_valid_workflow_has_no_issues() {
    let report = validate_workflow(&create_simple_graph());
    assert!(report.is_valid());
    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert_eq!(report.summary(), "");
}

#[test]
fn test_missing_start_node_is_an_error() {
    let mut graph = create_simple_graph();
    graph.nodes.retain(|n| n.kind != NodeKind::Start);
    graph.edges.retain(|e| e.source != "start");

    let report = validate_workflow(&graph);
    assert!(!report.is_valid());
    assert_eq!(
        messages(&report),
        vec![
            "Workflow must have a start node",
            "Node \"check\" has no incoming connections"
        ]
    );
    assert_eq!(report.warnings().count(), 1);
    assert_eq!(report.summary(), "1 error, 1 warning");
}

#[test]
fn test_second_start_node_is_a_warning() {
    let graph = create_simple_graph().with_node(start_node("start-2", 0.0, 600.0));
    let report = validate_workflow(&graph);

    assert!(report.is_valid());
    assert_eq!(
        messages(&report),
        vec!["Workflow should have only one start node"]
    );
}

#[test]
fn test_start_node_needs_a_data_source() {
    let mut graph = create_simple_graph();
    graph.node_mut("start").unwrap().data.config = Some(json!({"merchant_id": "SHOP001"}));
    let report = validate_workflow(&graph);
    assert_eq!(
        messages(&report),
        vec!["Start node \"Start\" must specify a data source"]
    );

    graph.node_mut("start").unwrap().data.config = None;
    let report = validate_workflow(&graph);
    assert_eq!(
        messages(&report),
        vec!["Start node \"Start\" is missing configuration"]
    );
}

#[test]
fn test_condition_node_branch_checks() {
    let mut graph = create_simple_graph();
    graph.edges.retain(|e| e.source != "check");

    let report = validate_workflow(&graph);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(
        messages(&report),
        vec![
            "Condition node \"check\" must have a Yes branch connected",
            "Condition node \"check\" has no No branch connected",
            "Node \"notify\" has no incoming connections",
            "Node \"log\" has no incoming connections",
        ]
    );
    let yes_issue = &report.issues[0];
    assert_eq!(yes_issue.severity, Severity::Error);
    assert_eq!(yes_issue.node_id.as_deref(), Some("check"));
    assert_eq!(
        yes_issue.to_string(),
        "[error] Condition node \"check\" must have a Yes branch connected (node: check)"
    );
}

#[test]
fn test_condition_contents_are_checked() {
    let mut graph = create_simple_graph();
    graph.node_mut("check").unwrap().data.conditions.clear();
    let report = validate_workflow(&graph);
    assert_eq!(
        messages(&report),
        vec!["Condition node \"check\" must have at least one condition"]
    );

    let incomplete = vec![
        Condition::new("c1", "", FieldKind::Number, Operator::GreaterThan, ""),
        text("c2", "phone", Operator::IsEmpty, ""),
    ];
    graph.node_mut("check").unwrap().data.conditions = incomplete;
    let report = validate_workflow(&graph);
    assert_eq!(
        messages(&report),
        vec![
            "Condition 1 in \"check\" must specify a data source",
            "Condition 1 in \"check\" must specify a field",
            "Condition 1 in \"check\" must specify a value for operator \"greater_than\"",
        ]
    );
}

#[test]
fn test_compile_workflow_covers_condition_nodes() {
    let workflow = create_simple_workflow();
    let compiled = QueryAssembler::default().compile_workflow(&workflow);

    assert_eq!(compiled.queries.len(), 1);
    let query = compiled.query_for("check").expect("check should be compiled");
    assert_eq!(query, &assemble(&workflow.graph.nodes[1].data.conditions));
    assert!(compiled.query_for("notify").is_none());
}

#[test]
fn test_workflow_summary_duplicate_and_toggle() {
    let mut workflow = create_simple_workflow();
    let summary = workflow.summary();
    assert_eq!(summary.node_count, 4);
    assert_eq!(summary.status, WorkflowStatus::Draft);

    let later = fixed_time() + chrono::Duration::hours(1);
    let copy = workflow.duplicate("wf-2", later);
    assert_eq!(copy.id, "wf-2");
    assert_eq!(copy.name, "Points milestone (Copy)");
    assert_eq!(copy.created_at, later);
    assert_eq!(copy.graph, workflow.graph);

    workflow.toggle_status(later);
    assert_eq!(workflow.status, WorkflowStatus::Active);
    assert_eq!(workflow.updated_at, later);
    workflow.toggle_status(later);
    assert_eq!(workflow.status, WorkflowStatus::Paused);
}

#[test]
fn test_editor_adds_start_node_once() {
    let workflow = Workflow::new("wf", "New", TriggerType::ScheduleBased, fixed_time());
    let mut editor = WorkflowEditor::new(workflow);

    assert!(editor.ensure_start_node());
    assert!(!editor.ensure_start_node());
    assert!(editor.is_dirty());

    let start = editor.workflow().graph.node(DEFAULT_START_NODE_ID).unwrap();
    assert_eq!(start.position, Position::new(250.0, 200.0));
    assert_eq!(
        start.data.start_config().unwrap().data_source.as_deref(),
        Some("CRM")
    );
}

#[test]
fn test_editor_connect_labels_and_ids() {
    let mut graph = create_simple_graph();
    graph.edges.retain(|e| e.source != "check");
    let mut editor = WorkflowEditor::new(create_simple_workflow().with_graph(graph));

    let edge = editor
        .connect(ProposedConnection::new("check", "notify").with_source_handle("yes"))
        .unwrap();
    assert_eq!(edge.id, "pcheck-notify-yes");
    assert_eq!(edge.label.as_deref(), Some("Yes"));
    assert!(edge.animated);

    let edge = editor
        .connect(ProposedConnection::new("check", "notify").with_source_handle("yes"))
        .unwrap();
    assert_eq!(edge.id, "pcheck-notify-yes-1");

    let edge = editor
        .connect(ProposedConnection::new("check", "log").with_source_handle("no"))
        .unwrap();
    assert_eq!(edge.label.as_deref(), Some("No"));
    assert!(editor.validate());
}

#[test]
fn test_editor_rejection_sets_notice_and_keeps_graph() {
    let mut editor = WorkflowEditor::new(create_simple_workflow());
    let before = editor.workflow().graph.clone();

    editor
        .add_node(node("other", NodeKind::Condition, 300.0, 600.0))
        .unwrap();
    let result = editor.connect(ProposedConnection::new("start", "other"));

    assert!(matches!(
        result,
        Err(EditorError::Rejected(
            ConnectionRejection::StartAlreadyConnected { .. }
        ))
    ));
    assert_eq!(
        editor.notice(),
        Some("Start node can only connect to one condition node")
    );
    assert_eq!(editor.workflow().graph.edges, before.edges);

    editor.dismiss_notice();
    assert_eq!(editor.notice(), None);

    // Silent rejections leave no notice.
    let result = editor.connect(ProposedConnection::new("notify", "check"));
    assert!(result.is_err());
    assert_eq!(editor.notice(), None);
}

#[test]
fn test_editor_delete_rules() {
    let mut editor = WorkflowEditor::new(create_simple_workflow());

    assert_eq!(
        editor.delete_node("start"),
        Err(EditorError::StartNodeLocked("start".to_string()))
    );
    assert_eq!(
        editor.add_node(node("check", NodeKind::Action, 0.0, 0.0)),
        Err(EditorError::DuplicateNode("check".to_string()))
    );

    editor.select_node(Some("check"));
    assert_eq!(editor.selected_node().map(|n| n.id.as_str()), Some("check"));

    let removed = editor.delete_node("check").unwrap();
    assert_eq!(removed.id, "check");
    assert!(editor.selected_node().is_none());
    assert!(editor.workflow().graph.edges.is_empty());

    assert_eq!(
        editor.delete_edge("missing"),
        Err(EditorError::UnknownEdge("missing".to_string()))
    );
}

#[test]
fn test_editor_validate_compile_and_save() {
    let mut editor = WorkflowEditor::new(create_simple_workflow());
    editor
        .set_conditions("check", vec![gender_condition(), expire_date_condition()])
        .unwrap();
    assert!(editor.is_dirty());

    assert!(editor.validate());
    assert!(editor.issues().is_empty());

    let compiled = editor.compile();
    let value = compiled.query_for("check").unwrap().to_value().unwrap();
    assert_eq!(
        value["contacts"]["where"],
        json!({"gender": "FEMALE", "merchant_id": MERCHANT_ID})
    );

    let saved_at = fixed_time() + chrono::Duration::minutes(5);
    editor.mark_saved(saved_at);
    assert!(!editor.is_dirty());
    assert_eq!(editor.workflow().updated_at, saved_at);
}
