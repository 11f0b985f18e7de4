use crate::condition::{Condition, ConditionValue, DateSpec, FieldKind, Operator};
use crate::query::{Clause, DatePart, Predicate, QueryOp};
use serde_json::Value;

/// Field whose values are normalized to upper case.
pub const GENDER_FIELD: &str = "gender";

/// Sentinel the store evaluates as the current date.
pub const CURRENT_DATE: &str = "CURRENT_DATE()";

/// Compiles one condition into a single predicate clause keyed by `field`.
///
/// `field` is passed separately from the condition because aggregated conditions are keyed
/// by an aggregate expression such as `SUM(orders.net_amount)`. Unknown operators produce an
/// equality clause; this function never fails.
pub fn compile_operator(field: &str, condition: &Condition) -> Clause {
    let value = condition.value.to_json();

    let predicate = match &condition.operator {
        Operator::Equals if field == GENDER_FIELD => Predicate::Value(uppercased(&condition.value)),
        Operator::Equals => Predicate::Value(value),
        Operator::NotEquals => Predicate::Op(QueryOp::NotEqual, value),
        Operator::GreaterThan if field == GENDER_FIELD && condition.value.as_str().is_some() => {
            Predicate::Value(uppercased(&condition.value))
        }
        Operator::GreaterThan => Predicate::Op(QueryOp::GreaterThan, value),
        Operator::LessThan => Predicate::Op(QueryOp::LessThan, value),
        Operator::GreaterEqual => Predicate::Op(QueryOp::GreaterEqual, value),
        Operator::LessEqual => Predicate::Op(QueryOp::LessEqual, value),
        Operator::Contains => Predicate::Op(QueryOp::Like, like_pattern(&condition.value)),
        Operator::NotContains => Predicate::Op(QueryOp::NotLike, like_pattern(&condition.value)),
        Operator::DateBefore => Predicate::Op(QueryOp::LessThan, value),
        Operator::DateAfter if condition.value.as_str() == Some("today") => {
            Predicate::Op(QueryOp::GreaterThan, Value::from(CURRENT_DATE))
        }
        Operator::DateAfter => Predicate::Op(QueryOp::GreaterThan, value),
        Operator::DateBetween => match range_bounds(condition) {
            Some(bounds) => Predicate::Op(QueryOp::Between, bounds),
            None => Predicate::Value(value),
        },
        Operator::DateNotBetween => match range_bounds(condition) {
            Some(bounds) => Predicate::Op(QueryOp::NotBetween, bounds),
            None => Predicate::Op(QueryOp::NotEqual, value),
        },
        Operator::IsEmpty => Predicate::Value(Value::Null),
        Operator::IsNotEmpty => Predicate::Op(QueryOp::NotEqual, Value::Null),
        Operator::Other(_) => Predicate::Value(value),
    };

    Clause::new(field, predicate)
}

/// True when the condition asks for "today is the anniversary of `field`".
pub fn is_anniversary(condition: &Condition) -> bool {
    matches!(condition.kind, FieldKind::Date(DateSpec::Anniversary))
        && condition.operator == Operator::Equals
        && condition.value.as_str() == Some("anniversary")
}

/// Compiles a condition into its clause list: two day/month clauses for an anniversary,
/// one clause from [`compile_operator`] otherwise.
pub fn compile_clauses(field: &str, condition: &Condition) -> Vec<Clause> {
    if is_anniversary(condition) {
        vec![
            Clause::new(field, Predicate::Matches(DatePart::CurrentDay)),
            Clause::new(field, Predicate::Matches(DatePart::CurrentMonth)),
        ]
    } else {
        vec![compile_operator(field, condition)]
    }
}

fn uppercased(value: &ConditionValue) -> Value {
    match value {
        ConditionValue::Text(s) => Value::String(s.to_uppercase()),
        other => other.to_json(),
    }
}

fn like_pattern(value: &ConditionValue) -> Value {
    Value::String(format!("%{}%", value))
}

fn range_bounds(condition: &Condition) -> Option<Value> {
    let (from, to) = condition.range_bounds()?;
    Some(Value::Array(vec![Value::from(from), Value::from(to)]))
}
