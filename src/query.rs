//! The compiled query grammar.
//!
//! A [`QueryDocument`] is a tree keyed by collection name. Every type here serializes to the
//! exact JSON shape the downstream store consumes, e.g.
//!
//! ```json
//! {"contacts": {"select": ["user_id"],
//!               "where": {"and": [{"point_balance": {">": 1000}}, {"merchant_id": "..."}]}}}
//! ```

use itertools::Itertools;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Comparison operators of the target grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOp {
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Like,
    NotLike,
    Between,
    NotBetween,
}

impl QueryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryOp::NotEqual => "!=",
            QueryOp::GreaterThan => ">",
            QueryOp::LessThan => "<",
            QueryOp::GreaterEqual => ">=",
            QueryOp::LessEqual => "<=",
            QueryOp::Like => "like",
            QueryOp::NotLike => "not like",
            QueryOp::Between => "between",
            QueryOp::NotBetween => "not between",
        }
    }
}

impl fmt::Display for QueryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar parts matched against the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    CurrentDay,
    CurrentMonth,
}

impl DatePart {
    pub fn as_str(self) -> &'static str {
        match self {
            DatePart::CurrentDay => "current_day",
            DatePart::CurrentMonth => "current_month",
        }
    }
}

/// The right-hand side of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `{field: value}`; a `null` value means "is empty".
    Value(Value),
    /// `{field: {op: operand}}`
    Op(QueryOp, Value),
    /// `{field: {part: true}}`
    Matches(DatePart),
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Predicate::Value(value) => value.serialize(serializer),
            Predicate::Op(op, operand) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(op.as_str(), operand)?;
                map.end()
            }
            Predicate::Matches(part) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(part.as_str(), &true)?;
                map.end()
            }
        }
    }
}

/// A single-key predicate object: `{field: predicate}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub predicate: Predicate,
}

impl Clause {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Predicate::Value(value.into()))
    }

    pub fn op(field: impl Into<String>, op: QueryOp, operand: impl Into<Value>) -> Self {
        Self::new(field, Predicate::Op(op, operand.into()))
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.predicate)?;
        map.end()
    }
}

/// A `where` or `having` filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// One clause, emitted bare.
    Clause(Clause),
    /// Clauses folded into one flat object. A repeated key keeps its first position and takes
    /// the later predicate.
    Merged(Vec<Clause>),
    /// `{"and": [...]}`
    And(Vec<Clause>),
}

impl Filter {
    /// One clause stays bare, several are wrapped in `and`, none yields no filter.
    pub fn from_clauses(mut clauses: Vec<Clause>) -> Option<Self> {
        match clauses.len() {
            0 => None,
            1 => clauses.pop().map(Filter::Clause),
            _ => Some(Filter::And(clauses)),
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        match self {
            Filter::Clause(clause) => std::slice::from_ref(clause),
            Filter::Merged(clauses) | Filter::And(clauses) => clauses,
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Clause(clause) => clause.serialize(serializer),
            Filter::Merged(clauses) => {
                let mut merged: Vec<(&str, &Predicate)> = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    match merged.iter_mut().find(|(field, _)| *field == clause.field) {
                        Some(slot) => slot.1 = &clause.predicate,
                        None => merged.push((clause.field.as_str(), &clause.predicate)),
                    }
                }
                let mut map = serializer.serialize_map(Some(merged.len()))?;
                for (field, predicate) in merged {
                    map.serialize_entry(field, predicate)?;
                }
                map.end()
            }
            Filter::And(clauses) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", &AndList(clauses))?;
                map.end()
            }
        }
    }
}

struct AndList<'a>(&'a [Clause]);

impl Serialize for AndList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for clause in self.0 {
            seq.serialize_element(clause)?;
        }
        seq.end()
    }
}

/// Removes repeated output columns, keeping first occurrences in order.
fn unique_columns<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).unique().collect()
}

/// A joined collection's subtree under the main collection document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinEntry {
    pub select: Vec<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub having: Option<Filter>,
    /// `"localKey:foreignKey"`
    pub join: String,
}

impl JoinEntry {
    pub fn new<I, S>(select: I, local_key: &str, foreign_key: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            select: unique_columns(select),
            filter: None,
            group_by: None,
            having: None,
            join: format!("{}:{}", local_key, foreign_key),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = Some(unique_columns(columns));
        self
    }

    pub fn with_having(mut self, having: Filter) -> Self {
        self.having = Some(having);
        self
    }
}

/// Joined collections in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Joins(Vec<(String, JoinEntry)>);

impl Joins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &str) -> Option<&JoinEntry> {
        self.0
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.get(collection).is_some()
    }

    /// Stores `entry` under `collection`. A replaced entry keeps its position and is returned.
    pub fn insert(&mut self, collection: impl Into<String>, entry: JoinEntry) -> Option<JoinEntry> {
        let collection = collection.into();
        match self.0.iter_mut().find(|(name, _)| *name == collection) {
            Some((_, slot)) => Some(std::mem::replace(slot, entry)),
            None => {
                self.0.push((collection, entry));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JoinEntry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

/// The query against the main collection, with its joins as sibling keys.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionQuery {
    pub select: Vec<String>,
    pub filter: Option<Filter>,
    pub group_by: Option<Vec<String>>,
    pub having: Option<Filter>,
    pub joins: Joins,
}

impl CollectionQuery {
    pub fn new<I, S>(select: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            select: unique_columns(select),
            filter: None,
            group_by: None,
            having: None,
            joins: Joins::new(),
        }
    }

    pub fn join(&self, collection: &str) -> Option<&JoinEntry> {
        self.joins.get(collection)
    }
}

impl Serialize for CollectionQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("select", &self.select)?;
        if let Some(filter) = &self.filter {
            map.serialize_entry("where", filter)?;
        }
        if let Some(group_by) = &self.group_by {
            map.serialize_entry("group_by", group_by)?;
        }
        if let Some(having) = &self.having {
            map.serialize_entry("having", having)?;
        }
        for (collection, entry) in self.joins.iter() {
            map.serialize_entry(collection, entry)?;
        }
        map.end()
    }
}

/// The compiler's output: the main collection's name and its query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocument {
    pub collection: String,
    pub query: CollectionQuery,
}

impl QueryDocument {
    pub fn new(collection: impl Into<String>, query: CollectionQuery) -> Self {
        Self {
            collection: collection.into(),
            query,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for QueryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.collection, &self.query)?;
        map.end()
    }
}

impl fmt::Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
