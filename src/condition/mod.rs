//! The condition model: one user-authored filter predicate and its metadata.

pub mod date;
pub mod operator;
pub mod raw;
pub mod value;

pub use date::*;
pub use operator::*;
pub use raw::*;
pub use value::*;

use serde::{Deserialize, Serialize};

/// The value shape of a condition, keyed by field type.
///
/// Date semantics only exist on `Date`, and select options only on `Select`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Number,
    Date(DateSpec),
    Select { options: Vec<String> },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Number => FieldType::Number,
            FieldKind::Date(_) => FieldType::Date,
            FieldKind::Select { .. } => FieldType::Select,
        }
    }

    pub fn date_spec(&self) -> Option<&DateSpec> {
        match self {
            FieldKind::Date(spec) => Some(spec),
            _ => None,
        }
    }
}

/// A single filterable predicate attached to a condition node.
///
/// Order within a condition list is significant: it decides merge order into the
/// compiled `where`/`having` clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCondition", into = "RawCondition")]
pub struct Condition {
    pub id: String,
    pub data_source: Option<String>,
    pub collection: Option<Collection>,
    pub field: String,
    pub kind: FieldKind,
    pub operator: Operator,
    pub value: ConditionValue,
    pub logical_operator: Option<LogicalOperator>,
    /// Bounds kept outside a `Range` date spec, for any field type.
    pub between_bounds: Option<DateBounds>,
}

impl Condition {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        kind: FieldKind,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            id: id.into(),
            data_source: None,
            collection: None,
            field: field.into(),
            kind,
            operator,
            value: value.into(),
            logical_operator: None,
            between_bounds: None,
        }
    }

    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    pub fn with_logical_operator(mut self, logical_operator: LogicalOperator) -> Self {
        self.logical_operator = Some(logical_operator);
        self
    }

    pub fn with_between_bounds(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.between_bounds = Some(DateBounds::new(from, to));
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn date_spec(&self) -> Option<&DateSpec> {
        self.kind.date_spec()
    }

    /// The `(from, to)` pair a between operator compares against: the range of a `Range`
    /// date spec, otherwise the bounds carried alongside the condition.
    pub fn range_bounds(&self) -> Option<(&str, &str)> {
        self.date_spec()
            .and_then(DateSpec::bounds)
            .or_else(|| {
                self.between_bounds
                    .as_ref()
                    .map(|b| (b.from.as_str(), b.to.as_str()))
            })
    }

    /// A one-line, human-readable description of the condition.
    pub fn summary(&self) -> String {
        if self.operator.is_unary() {
            return format!("{} {}", self.field, self.operator.symbol());
        }

        let between = matches!(
            self.operator,
            Operator::DateBetween | Operator::DateNotBetween
        );
        let rendered = match (self.date_spec(), self.range_bounds()) {
            (Some(DateSpec::Anniversary), _) => return format!("{} is anniversary", self.field),
            (Some(DateSpec::Range { from, to }), _) => format!("{} - {}", from, to),
            (_, Some((from, to))) if between => format!("{} - {}", from, to),
            (Some(_), None) if between => "date range".to_string(),
            (
                Some(DateSpec::Relative {
                    period_number,
                    period_unit,
                }),
                _,
            ) => {
                let unit = period_unit.to_string();
                let unit = if *period_number == 1 {
                    unit.trim_end_matches('s').to_string()
                } else {
                    unit
                };
                format!("{} {} ago", period_number, unit)
            }
            _ => self.value.to_string(),
        };

        format!("{} {} {}", self.field, self.operator.symbol(), rendered)
    }
}
