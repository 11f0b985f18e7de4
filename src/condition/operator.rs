use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison requested by a condition.
///
/// Operator names outside the known set are kept verbatim in `Other` rather than rejected,
/// so the compiler can fall back to an equality clause for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Contains,
    NotContains,
    DateBefore,
    DateAfter,
    DateBetween,
    DateNotBetween,
    IsEmpty,
    IsNotEmpty,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterEqual => "greater_equal",
            Operator::LessEqual => "less_equal",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::DateBefore => "date_before",
            Operator::DateAfter => "date_after",
            Operator::DateBetween => "date_between",
            Operator::DateNotBetween => "date_not_between",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::Other(name) => name,
        }
    }

    /// Operators that test presence and therefore take no value.
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }

    /// Short symbol used in human-readable summaries.
    pub fn symbol(&self) -> &str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Contains => "contains",
            Operator::NotContains => "does not contain",
            Operator::DateBefore => "before",
            Operator::DateAfter => "after",
            Operator::DateBetween => "between",
            Operator::DateNotBetween => "not between",
            Operator::IsEmpty => "is empty",
            Operator::IsNotEmpty => "is not empty",
            Operator::Other(name) => name,
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        match name {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "greater_than" => Operator::GreaterThan,
            "less_than" => Operator::LessThan,
            "greater_equal" => Operator::GreaterEqual,
            "less_equal" => Operator::LessEqual,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "date_before" => Operator::DateBefore,
            "date_after" => Operator::DateAfter,
            "date_between" => Operator::DateBetween,
            "date_not_between" => Operator::DateNotBetween,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            other => Operator::Other(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::from(name.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named logical data group a field belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Collection {
    Contacts,
    Orders,
    PointHistories,
    Products,
    Other(String),
}

impl Collection {
    pub fn as_str(&self) -> &str {
        match self {
            Collection::Contacts => "contacts",
            Collection::Orders => "orders",
            Collection::PointHistories => "point_histories",
            Collection::Products => "products",
            Collection::Other(name) => name,
        }
    }
}

impl From<&str> for Collection {
    fn from(name: &str) -> Self {
        match name {
            "contacts" => Collection::Contacts,
            "orders" => Collection::Orders,
            "point_histories" => Collection::PointHistories,
            "products" => Collection::Products,
            other => Collection::Other(other.to_string()),
        }
    }
}

impl From<String> for Collection {
    fn from(name: String) -> Self {
        Collection::from(name.as_str())
    }
}

impl From<Collection> for String {
    fn from(collection: Collection) -> Self {
        collection.as_str().to_string()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connective between a condition and the one before it.
///
/// Only `And` is compiled distinctly; `Or` is carried as data and merged with AND semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}
