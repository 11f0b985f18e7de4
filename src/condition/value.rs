use serde::{Deserialize, Serialize};
use std::fmt;

/// The right-hand side of a condition, as entered in the editor.
///
/// Numbers keep their original JSON representation so that an integer threshold such as
/// `1000` is emitted as `1000` and never as `1000.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(serde_json::Number),
    Text(String),
}

impl ConditionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConditionValue::Text(s) => Some(s),
            ConditionValue::Number(_) => None,
        }
    }

    /// True for an empty text value.
    pub fn is_blank(&self) -> bool {
        matches!(self, ConditionValue::Text(s) if s.is_empty())
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConditionValue::Number(n) => serde_json::Value::Number(n.clone()),
            ConditionValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl Default for ConditionValue {
    fn default() -> Self {
        ConditionValue::Text(String::new())
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value.into())
    }
}

impl From<u64> for ConditionValue {
    fn from(value: u64) -> Self {
        ConditionValue::Number(value.into())
    }
}

impl From<i32> for ConditionValue {
    fn from(value: i32) -> Self {
        ConditionValue::Number(value.into())
    }
}
