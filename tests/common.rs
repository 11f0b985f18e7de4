//! Common test utilities for building conditions and workflow graphs.
use chrono::{DateTime, TimeZone, Utc};
use joken::graph::{HANDLE_NO, HANDLE_YES, NodeData, StartConfig, TriggerType};
use joken::prelude::*;

pub const MERCHANT_ID: &str = "68468c7bbffca9a0a6b2a413";

/// A number condition with no explicit collection.
#[allow(dead_code)]
pub fn number(id: &str, field: &str, operator: Operator, value: i64) -> Condition {
    Condition::new(id, field, FieldKind::Number, operator, value).with_data_source("CRM")
}

#[allow(dead_code)]
pub fn text(id: &str, field: &str, operator: Operator, value: &str) -> Condition {
    Condition::new(id, field, FieldKind::Text, operator, value).with_data_source("CRM")
}

#[allow(dead_code)]
pub fn date(id: &str, field: &str, spec: DateSpec, operator: Operator, value: &str) -> Condition {
    Condition::new(id, field, FieldKind::Date(spec), operator, value).with_data_source("CRM")
}

#[allow(dead_code)]
pub fn range(from: &str, to: &str) -> DateSpec {
    DateSpec::Range {
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// `gender equals "female"` as the condition editor produces it.
#[allow(dead_code)]
pub fn gender_condition() -> Condition {
    Condition::new(
        "c-gender",
        "gender",
        FieldKind::Select {
            options: vec!["male".to_string(), "female".to_string()],
        },
        Operator::Equals,
        "female",
    )
    .with_data_source("CRM")
}

/// `expire_date before 2024-12-31` on point histories.
#[allow(dead_code)]
pub fn expire_date_condition() -> Condition {
    date(
        "c-expire",
        "expire_date",
        DateSpec::Specific,
        Operator::DateBefore,
        "2024-12-31",
    )
    .with_collection(Collection::PointHistories)
    .with_logical_operator(LogicalOperator::And)
}

#[allow(dead_code)]
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 16, 11, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind, x: f64, y: f64) -> WorkflowNode {
    WorkflowNode::new(id, kind, Position::new(x, y))
}

#[allow(dead_code)]
pub fn start_node(id: &str, x: f64, y: f64) -> WorkflowNode {
    let config = StartConfig {
        data_source: Some("CRM".to_string()),
        merchant_id: Some("SHOP001".to_string()),
        ..StartConfig::default()
    };
    let data = NodeData {
        config: Some(serde_json::to_value(config).unwrap()),
        ..NodeData::new("Start")
    };
    node(id, NodeKind::Start, x, y).with_data(data)
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> WorkflowEdge {
    WorkflowEdge::new(format!("e-{}-{}", source, target), source, target)
}

/// A canvas laid out in one row, left to right:
///
/// `start (0,0) -> check (300,0) -yes-> notify (600,0)` and `check -no-> log (600,300)`.
#[allow(dead_code)]
pub fn create_simple_graph() -> WorkflowGraph {
    WorkflowGraph::new()
        .with_node(start_node("start", 0.0, 0.0))
        .with_node(
            node("check", NodeKind::Condition, 300.0, 0.0)
                .with_conditions(vec![number("c1", "point_balance", Operator::GreaterThan, 1000)]),
        )
        .with_node(node("notify", NodeKind::Action, 600.0, 0.0))
        .with_node(node("log", NodeKind::Step, 600.0, 300.0))
        .with_edge(edge("start", "check"))
        .with_edge(edge("check", "notify").with_source_handle(HANDLE_YES))
        .with_edge(edge("check", "log").with_source_handle(HANDLE_NO))
}

#[allow(dead_code)]
pub fn create_simple_workflow() -> Workflow {
    Workflow::new("wf-1", "Points milestone", TriggerType::EventBased, fixed_time())
        .with_graph(create_simple_graph())
}

/// A persisted workflow in the legacy camelCase layout.
#[allow(dead_code)]
pub const LEGACY_WORKFLOW_JSON: &str = r#"{
    "id": "sample-7",
    "name": "Simple Points Milestone Notification",
    "description": "Send LINE notification when customer points exceed 1000",
    "triggerType": "event-based",
    "status": "active",
    "createdAt": "2024-01-16T11:00:00Z",
    "updatedAt": "2024-01-16T11:00:00Z",
    "actions": [
        {
            "id": "start-7",
            "position": {"x": 100, "y": 300},
            "data": {
                "label": "Points Update Trigger",
                "type": "start",
                "status": "active",
                "config": {
                    "label": "Points Update Trigger",
                    "merchantId": "SHOP001",
                    "dataSource": "CRM",
                    "eventType": "points_updated"
                }
            }
        },
        {
            "id": "condition-7",
            "type": "condition",
            "position": {"x": 700, "y": 300},
            "data": {
                "label": "Points > 1000",
                "type": "condition",
                "conditions": [
                    {
                        "id": "cond-7",
                        "dataSource": "CRM",
                        "collection": "contacts",
                        "field": "point_balance",
                        "fieldType": "number",
                        "operator": "greater_than",
                        "value": 1000
                    }
                ]
            }
        },
        {
            "id": "action-26",
            "type": "action",
            "position": {"x": 1300, "y": 200},
            "data": {"label": "Send LINE notification", "config": {"lineUserId": "line_user_id"}}
        },
        {
            "id": "log-7",
            "type": "step",
            "position": {"x": 1300, "y": 400},
            "data": {"label": "Log condition not met"}
        }
    ],
    "peers": [
        {"id": "e45", "source": "start-7", "target": "condition-7", "animated": true},
        {"id": "e46-yes", "source": "condition-7", "target": "action-26", "sourceHandle": "yes", "animated": true, "label": "Yes"},
        {"id": "e47-no", "source": "condition-7", "target": "log-7", "sourceHandle": "no", "animated": true, "label": "No"}
    ]
}"#;
