use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of a relative date period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    #[default]
    Days,
    Weeks,
    Months,
    Years,
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeriodUnit::Days => "days",
            PeriodUnit::Weeks => "weeks",
            PeriodUnit::Months => "months",
            PeriodUnit::Years => "years",
        })
    }
}

/// Wire-level tag for how a date condition is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateType {
    Today,
    Specific,
    Relative,
    Range,
    Anniversary,
}

/// Date semantics of a date-typed condition.
///
/// Each variant carries exactly the metadata it needs, so a `Range` can never exist
/// without both of its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DateSpec {
    Today,
    #[default]
    Specific,
    Relative {
        period_number: u32,
        period_unit: PeriodUnit,
    },
    Range {
        from: String,
        to: String,
    },
    Anniversary,
}

impl DateSpec {
    pub fn date_type(&self) -> DateType {
        match self {
            DateSpec::Today => DateType::Today,
            DateSpec::Specific => DateType::Specific,
            DateSpec::Relative { .. } => DateType::Relative,
            DateSpec::Range { .. } => DateType::Range,
            DateSpec::Anniversary => DateType::Anniversary,
        }
    }

    /// Both bounds of a range, if this is one.
    pub fn bounds(&self) -> Option<(&str, &str)> {
        match self {
            DateSpec::Range { from, to } => Some((from, to)),
            _ => None,
        }
    }
}

/// `date_from`/`date_to` carried by a between condition whose date semantics are not a range,
/// such as a `specific` date left with the bounds of an earlier range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateBounds {
    pub from: String,
    pub to: String,
}

impl DateBounds {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
