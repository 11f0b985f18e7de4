use super::{
    Collection, Condition, ConditionValue, DateBounds, DateSpec, DateType, FieldKind,
    LogicalOperator, Operator, PeriodUnit,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Wire-level field type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
}

/// The flat key-value form of a condition as exchanged with the editor and persisted.
///
/// Optional members are only meaningful for some `field_type`/`date_type` combinations;
/// converting into [`Condition`] keeps the ones that apply and drops the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<Collection>,
    pub field: String,
    pub field_type: FieldType,
    pub operator: Operator,
    #[serde(default)]
    pub value: ConditionValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_type: Option<DateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_unit: Option<PeriodUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

impl RawCondition {
    fn bounds(&self) -> Option<(String, String)> {
        let present = |s: &Option<String>| s.as_ref().filter(|s| !s.is_empty()).cloned();
        Some((present(&self.date_from)?, present(&self.date_to)?))
    }

    fn date_spec(&self) -> DateSpec {
        match self.date_type {
            Some(DateType::Today) => DateSpec::Today,
            Some(DateType::Specific) => DateSpec::Specific,
            Some(DateType::Anniversary) => DateSpec::Anniversary,
            Some(DateType::Relative) => DateSpec::Relative {
                period_number: self.period_number.unwrap_or(1),
                period_unit: self.period_unit.unwrap_or_default(),
            },
            Some(DateType::Range) => match self.bounds() {
                Some((from, to)) => DateSpec::Range { from, to },
                None => {
                    warn!(
                        condition_id = %self.id,
                        "range condition is missing a bound; treating it as a specific date"
                    );
                    DateSpec::Specific
                }
            },
            None => match self.bounds() {
                Some((from, to)) => DateSpec::Range { from, to },
                None => DateSpec::Specific,
            },
        }
    }
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        let kind = match raw.field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Number => FieldKind::Number,
            FieldType::Date => FieldKind::Date(raw.date_spec()),
            FieldType::Select => FieldKind::Select {
                options: raw.select_options.clone().unwrap_or_default(),
            },
        };

        // A between operator reads `date_from`/`date_to` whatever the date type, so bounds a
        // range spec did not absorb stay on the condition.
        let between_bounds = match kind {
            FieldKind::Date(DateSpec::Range { .. }) => None,
            _ => raw.bounds().map(|(from, to)| DateBounds { from, to }),
        };

        Condition {
            id: raw.id,
            data_source: raw.data_source,
            collection: raw.collection.filter(|c| !c.as_str().is_empty()),
            field: raw.field,
            kind,
            operator: raw.operator,
            value: raw.value,
            logical_operator: raw.logical_operator,
            between_bounds,
        }
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        let mut raw = RawCondition {
            id: condition.id,
            data_source: condition.data_source,
            collection: condition.collection,
            field: condition.field,
            field_type: condition.kind.field_type(),
            operator: condition.operator,
            value: condition.value,
            select_options: None,
            logical_operator: condition.logical_operator,
            date_type: None,
            period_number: None,
            period_unit: None,
            date_from: None,
            date_to: None,
        };

        match condition.kind {
            FieldKind::Select { options } => raw.select_options = Some(options),
            FieldKind::Date(spec) => {
                raw.date_type = Some(spec.date_type());
                match spec {
                    DateSpec::Relative {
                        period_number,
                        period_unit,
                    } => {
                        raw.period_number = Some(period_number);
                        raw.period_unit = Some(period_unit);
                    }
                    DateSpec::Range { from, to } => {
                        raw.date_from = Some(from);
                        raw.date_to = Some(to);
                    }
                    _ => {}
                }
            }
            FieldKind::Text | FieldKind::Number => {}
        }

        if let Some(DateBounds { from, to }) = condition.between_bounds {
            raw.date_from = Some(from);
            raw.date_to = Some(to);
        }

        raw
    }
}
