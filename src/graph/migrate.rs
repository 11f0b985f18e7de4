//! Load-boundary migration of persisted workflow documents.
//!
//! Older documents name the node list `actions`, the edge list `peers`, and use camelCase
//! keys. Migration rewrites them to the current names once, before typed deserialization.

use super::workflow::Workflow;
use crate::error::WorkflowLoadError;
use serde_json::{Map, Value};

const WORKFLOW_KEYS: &[(&str, &str)] = &[
    ("actions", "nodes"),
    ("peers", "edges"),
    ("triggerType", "trigger_type"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("lastTriggered", "last_triggered"),
];

const START_CONFIG_KEYS: &[(&str, &str)] = &[
    ("merchantId", "merchant_id"),
    ("dataSource", "data_source"),
];

const CONDITION_KEYS: &[(&str, &str)] = &[
    ("dataSource", "data_source"),
    ("fieldType", "field_type"),
    ("selectOptions", "select_options"),
    ("logicalOperator", "logical_operator"),
    ("dateType", "date_type"),
    ("periodNumber", "period_number"),
    ("periodUnit", "period_unit"),
    ("dateFrom", "date_from"),
    ("dateTo", "date_to"),
];

const EDGE_KEYS: &[(&str, &str)] = &[
    ("sourceHandle", "source_handle"),
    ("targetHandle", "target_handle"),
];

/// Renames legacy keys; when both spellings exist the current one is kept.
fn rename_keys(object: &mut Map<String, Value>, renames: &[(&str, &str)]) {
    for (old, new) in renames {
        if let Some(value) = object.remove(*old) {
            object.entry(*new).or_insert(value);
        }
    }
}

fn objects_in<'a>(
    object: &'a mut Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    object
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn migrate_node(node: &mut Map<String, Value>) {
    if !node.contains_key("type") {
        let data_type = node
            .get("data")
            .and_then(|data| data.get("type"))
            .cloned();
        if let Some(kind) = data_type {
            node.insert("type".to_string(), kind);
        }
    }

    let is_start = node.get("type").and_then(Value::as_str) == Some("start");
    let Some(data) = node.get_mut("data").and_then(Value::as_object_mut) else {
        return;
    };

    if is_start {
        if let Some(config) = data.get_mut("config").and_then(Value::as_object_mut) {
            rename_keys(config, START_CONFIG_KEYS);
        }
    }
    for condition in objects_in(data, "conditions") {
        rename_keys(condition, CONDITION_KEYS);
    }
}

/// Rewrites a persisted workflow document to the current key layout.
///
/// Documents already in the current layout come back unchanged.
pub fn migrate_document(mut document: Value) -> Result<Value, WorkflowLoadError> {
    let workflow = document
        .as_object_mut()
        .ok_or(WorkflowLoadError::NotAnObject)?;

    rename_keys(workflow, WORKFLOW_KEYS);
    for node in objects_in(workflow, "nodes") {
        migrate_node(node);
    }
    for edge in objects_in(workflow, "edges") {
        rename_keys(edge, EDGE_KEYS);
    }

    Ok(document)
}

/// Migrates and deserializes a persisted workflow document.
pub fn migrate_workflow(document: Value) -> Result<Workflow, WorkflowLoadError> {
    let migrated = migrate_document(document)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Parses workflow JSON text in either the legacy or the current layout.
pub fn load_workflow(json: &str) -> Result<Workflow, WorkflowLoadError> {
    migrate_workflow(serde_json::from_str(json)?)
}
